//! Game state and host-level simulation types
//!
//! Everything the host loop mutates lives here, so a run is reproducible
//! from its settings and seed alone.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::bins::BinRegistry;
use super::board::{BinIndex, BoardGeometry};
use super::tuning::PhysicsTuning;
use crate::settings::Settings;
use crate::ui::{Editor, Popup};

/// Seed used when the settings do not pin one
pub const DEFAULT_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// Something the host (renderer, DOM overlay, CLI) may want to react to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    BallDropped,
    BallLanded { bin: BinIndex, label: String },
    ModeChanged { editing: bool },
    BoardRebuilt { rows: u32 },
    PopupDismissed,
}

/// Complete game state (deterministic given the seed)
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    /// The single pseudo-random source for spawns and pin nudges
    pub rng: Pcg32,
    /// Board design size
    pub board_size: Vec2,
    pub tuning: PhysicsTuning,
    pub geometry: BoardGeometry,
    pub bins: BinRegistry,
    pub editor: Editor,
    pub popup: Popup,
    /// The active ball, if any; there is never more than one
    pub ball: Option<Ball>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Balls dropped so far
    pub drops: u64,
}

impl GameState {
    pub fn new(settings: &Settings) -> Self {
        let seed = settings.seed.unwrap_or(DEFAULT_SEED);
        let geometry = BoardGeometry::new(settings.pin_rows, settings.board_width);
        let bins = BinRegistry::new(settings.pin_rows, &settings.bin_labels);
        let editor = Editor::new(settings.pin_rows, bins.labels());

        log::info!(
            "board: {} rows, spacing {}, seed {}",
            geometry.rows,
            geometry.pin_spacing,
            seed
        );

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            board_size: Vec2::new(settings.board_width, settings.board_height),
            tuning: settings.physics,
            geometry,
            bins,
            editor,
            popup: Popup::default(),
            ball: None,
            time_ticks: 0,
            drops: 0,
        }
    }

    pub fn has_active_ball(&self) -> bool {
        self.ball.as_ref().is_some_and(|b| b.active)
    }

    /// Spawn a ball unless one is already in flight or the editor is open
    ///
    /// Returns whether a ball was spawned.
    pub fn try_drop_ball(&mut self) -> bool {
        if self.editor.edit_mode {
            log::debug!("drop ignored in edit mode");
            return false;
        }
        if self.has_active_ball() {
            log::debug!("drop ignored, ball already in flight");
            return false;
        }

        let ball = Ball::spawn(&self.geometry, self.tuning, &mut self.rng);
        log::debug!("ball dropped with vx {:.3}", ball.vel.x);
        self.ball = Some(ball);
        self.drops += 1;
        true
    }

    /// Rebuild geometry and bins from the editor's applied values
    pub fn rebuild_board(&mut self) {
        let rows = self.editor.row_value();
        self.geometry = BoardGeometry::new(rows, self.board_size.x);
        self.bins = BinRegistry::new(rows, self.editor.labels());
        self.editor.reset_labels(self.bins.labels());
        log::info!(
            "board rebuilt: {} rows, spacing {}",
            rows,
            self.geometry.pin_spacing
        );
    }
}
