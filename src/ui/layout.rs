//! Letterboxing: the fixed-size board scaled uniformly into the window

use glam::Vec2;

/// Uniform board → screen transform with centering bars
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    /// Window size in physical pixels
    pub screen: Vec2,
    /// Board design size
    pub base: Vec2,
    pub scale: f32,
    /// Top-left corner of the scaled board on screen
    pub offset: Vec2,
}

impl Letterbox {
    pub fn fit(screen: Vec2, base: Vec2) -> Self {
        let scale = (screen.x / base.x).min(screen.y / base.y).max(f32::EPSILON);
        let offset = (screen - base * scale) / 2.0;
        Self {
            screen,
            base,
            scale,
            offset,
        }
    }

    /// Screen position to board position; `None` in the bars
    pub fn screen_to_board(&self, pos: Vec2) -> Option<Vec2> {
        let board = (pos - self.offset) / self.scale;
        let inside = board.x >= 0.0 && board.y >= 0.0 && board.x <= self.base.x && board.y <= self.base.y;
        inside.then_some(board)
    }

    pub fn board_to_screen(&self, pos: Vec2) -> Vec2 {
        self.offset + pos * self.scale
    }

    /// Board position to normalized device coordinates (y up)
    pub fn board_to_ndc(&self, pos: Vec2) -> Vec2 {
        let screen = self.board_to_screen(pos);
        Vec2::new(
            screen.x / self.screen.x * 2.0 - 1.0,
            1.0 - screen.y / self.screen.y * 2.0,
        )
    }
}
