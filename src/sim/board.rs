//! Board geometry: the pin triangle and the bin row beneath it
//!
//! Pins are never stored. Their positions are derived from the row count and
//! spacing whenever they are needed, so a row-count change is visible on the
//! very next tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_PIN_SPACING, PIN_GRID_TOP};

/// Index of a bin, 0 at the left
pub type BinIndex = usize;

/// Pin spacing for a board: whole pixels, capped at `MAX_PIN_SPACING`
pub fn pin_spacing_for(rows: u32, board_width: f32) -> f32 {
    (board_width / (rows + 2) as f32).floor().min(MAX_PIN_SPACING)
}

/// Read-only geometry handed to the ball each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardGeometry {
    /// Number of pin rows (row `r` holds `r + 1` pins)
    pub rows: u32,
    pub board_width: f32,
    pub pin_spacing: f32,
    /// y of the first pin row
    pub pin_grid_top: f32,
}

impl BoardGeometry {
    pub fn new(rows: u32, board_width: f32) -> Self {
        Self {
            rows,
            board_width,
            pin_spacing: pin_spacing_for(rows, board_width),
            pin_grid_top: PIN_GRID_TOP,
        }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.board_width / 2.0
    }

    pub fn pin_count(&self) -> usize {
        let rows = self.rows as usize;
        rows * (rows + 1) / 2
    }

    /// Position of pin `col` in row `row` (both 0-indexed, `col <= row`)
    #[inline]
    pub fn pin_position(&self, row: u32, col: u32) -> Vec2 {
        let row_start = self.center_x() - row as f32 * self.pin_spacing / 2.0;
        Vec2::new(
            row_start + col as f32 * self.pin_spacing,
            self.pin_grid_top + row as f32 * self.pin_spacing,
        )
    }

    /// All pins, row by row, left to right
    pub fn pins(&self) -> impl Iterator<Item = Vec2> {
        let geometry = *self;
        (0..geometry.rows)
            .flat_map(move |row| (0..=row).map(move |col| geometry.pin_position(row, col)))
    }

    /// Bottom of the pin grid as used for landing: one spacing below the last row
    pub fn grid_bottom(&self) -> f32 {
        self.pin_grid_top + self.rows as f32 * self.pin_spacing
    }

    pub fn bin_count(&self) -> usize {
        self.rows as usize + 1
    }

    /// Left edge of bin 0
    pub fn bins_row_start_x(&self) -> f32 {
        (self.board_width - self.bin_count() as f32 * self.pin_spacing) / 2.0
    }

    pub fn bin_left(&self, bin: BinIndex) -> f32 {
        self.bins_row_start_x() + bin as f32 * self.pin_spacing
    }

    pub fn bin_center(&self, bin: BinIndex) -> f32 {
        self.bin_left(bin) + self.pin_spacing / 2.0
    }

    /// Bin under `x`; positions outside the bin row map to the nearest end bin
    pub fn bin_at(&self, x: f32) -> BinIndex {
        let raw = ((x - self.bins_row_start_x()) / self.pin_spacing).floor();
        // NaN casts to 0, infinities saturate
        (raw as i64).clamp(0, self.rows as i64) as BinIndex
    }
}
