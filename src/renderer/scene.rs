//! Board scene: turns a `GameState` into a board-space triangle list
//!
//! Text (title, bin labels, popup message, editor fields) lives in the DOM
//! overlay; this only draws the shapes behind it.

use glam::Vec2;

use super::shapes::{ALL_CORNERS, circle, rect, rounded_rect};
use super::vertex::Vertex;
use crate::colors::palette;
use crate::sim::{Ball, BinIndex, BinRegistry, BoardGeometry, GameState};
use crate::ui::Rect;

/// Bins are squares this fraction of the pin spacing wide
const BIN_WIDTH_RATIO: f32 = 0.8;
/// How far a bin sinks while highlighted
const BIN_PRESS_OFFSET: f32 = 4.0;
const BIN_CORNER_RADIUS: f32 = 4.0;
const POPUP_CORNER_RADIUS: f32 = 15.0;
const POPUP_BORDER: f32 = 4.0;
/// Space below the bin row when the bins reach past the board height
const BOTTOM_MARGIN: f32 = 20.0;
const EDITOR_OVERLAY_ALPHA: f32 = 200.0 / 255.0;

const PIN_SEGMENTS: u32 = 12;
const BALL_SEGMENTS: u32 = 24;

/// Underline below the title text
pub const TITLE_RULE: Rect = Rect::new(20.0, 54.0, 240.0, 2.0);

/// Face rectangle of a bin (unpressed)
pub fn bin_rect(geometry: &BoardGeometry, bin: BinIndex) -> Rect {
    let size = geometry.pin_spacing * BIN_WIDTH_RATIO;
    let top = geometry.grid_bottom() + geometry.pin_spacing / 2.0;
    Rect::new(geometry.bin_center(bin) - size / 2.0, top, size, size)
}

/// Face rectangle as currently drawn, including the pressed offset
pub fn bin_face_rect(geometry: &BoardGeometry, bins: &BinRegistry, bin: BinIndex) -> Rect {
    let face = bin_rect(geometry, bin);
    if bins.is_highlighted(bin) {
        face.offset(Vec2::new(0.0, BIN_PRESS_OFFSET))
    } else {
        face
    }
}

/// Visible area in board space
///
/// Tall boards (many rows) push the bin row below the design height, so the
/// view grows downward to keep the bins on screen.
pub fn view_size(state: &GameState) -> Vec2 {
    let geometry = &state.geometry;
    let bins_bottom = bin_rect(geometry, 0).max().y + BIN_PRESS_OFFSET + BOTTOM_MARGIN;
    Vec2::new(state.board_size.x, state.board_size.y.max(bins_bottom))
}

/// Build the full frame in draw order
pub fn build(state: &GameState) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(4096);
    let view = view_size(state);
    let board = Rect::new(0.0, 0.0, view.x, view.y);

    out.extend(rect(board, palette::BOARD.to_linear()));
    out.extend(rect(TITLE_RULE, palette::TITLE.to_linear()));

    draw_pins(&state.geometry, state.tuning.pin_radius, &mut out);
    draw_bins(&state.geometry, &state.bins, &mut out);

    if let Some(ball) = &state.ball {
        draw_ball(ball, &mut out);
    }

    if state.editor.edit_mode {
        out.extend(rect(
            board,
            palette::EDITOR_OVERLAY.with_alpha(EDITOR_OVERLAY_ALPHA),
        ));
    }

    if state.popup.active {
        let popup = &state.popup;
        let border = Rect::new(
            popup.rect.x - POPUP_BORDER,
            popup.rect.y - POPUP_BORDER,
            popup.rect.w + 2.0 * POPUP_BORDER,
            popup.rect.h + 2.0 * POPUP_BORDER,
        );
        out.extend(rounded_rect(
            border,
            POPUP_CORNER_RADIUS + POPUP_BORDER,
            ALL_CORNERS,
            popup.color.to_linear(),
        ));
        out.extend(rounded_rect(
            popup.rect,
            POPUP_CORNER_RADIUS,
            ALL_CORNERS,
            palette::POPUP.to_linear(),
        ));
    }

    out
}

fn draw_pins(geometry: &BoardGeometry, pin_radius: f32, out: &mut Vec<Vertex>) {
    let color = palette::PIN.to_linear();
    for pin in geometry.pins() {
        out.extend(circle(pin, pin_radius, color, PIN_SEGMENTS));
    }
}

fn draw_bins(geometry: &BoardGeometry, bins: &BinRegistry, out: &mut Vec<Vertex>) {
    for bin in 0..bins.len() {
        let face = bin_rect(geometry, bin);
        if !bins.is_highlighted(bin) {
            let shadow = face.offset(Vec2::new(0.0, BIN_PRESS_OFFSET));
            out.extend(rounded_rect(
                shadow,
                BIN_CORNER_RADIUS,
                ALL_CORNERS,
                bins.shadow_color(bin).to_linear(),
            ));
        }
        out.extend(rounded_rect(
            bin_face_rect(geometry, bins, bin),
            BIN_CORNER_RADIUS,
            ALL_CORNERS,
            bins.color(bin).to_linear(),
        ));
    }
}

/// Draw the ball; an inactive ball draws nothing
pub fn draw_ball(ball: &Ball, out: &mut Vec<Vertex>) {
    if !ball.active {
        return;
    }
    out.extend(circle(ball.pos, ball.radius, ball.color.to_linear(), BALL_SEGMENTS));
}
