//! Landing popup

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::Rect;
use crate::colors::{Rgb, palette};
use crate::consts::POPUP_FONT_PX;

const MIN_WIDTH: f32 = 200.0;
const MIN_HEIGHT: f32 = 80.0;
const PADDING: f32 = 20.0;

/// Rough rendered size of a single line of text
///
/// Glyphs average about half the font size in width.
pub fn estimate_text_size(text: &str, font_px: f32) -> Vec2 {
    Vec2::new(text.chars().count() as f32 * font_px * 0.5, font_px)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Popup {
    pub active: bool,
    pub message: String,
    /// Tint of the bin that was hit
    pub color: Rgb,
    pub rect: Rect,
}

impl Default for Popup {
    fn default() -> Self {
        Self {
            active: false,
            message: String::new(),
            color: palette::WHITE,
            rect: Rect::default(),
        }
    }
}

impl Popup {
    /// Show `message`, sized to fit and horizontally centered on the board
    pub fn show(&mut self, message: impl Into<String>, color: Rgb, board_size: Vec2) {
        self.message = message.into();
        self.color = color;
        self.active = true;

        let text = estimate_text_size(&self.message, POPUP_FONT_PX);
        let w = MIN_WIDTH.max(text.x + PADDING * 2.0);
        let h = MIN_HEIGHT.max(text.y + PADDING * 2.0);
        self.rect = Rect::new(
            ((board_size.x - w) / 2.0).floor(),
            (board_size.y / 3.0).floor(),
            w,
            h,
        );
    }

    pub fn hide(&mut self) {
        self.active = false;
    }

    /// Hide the popup if `pos` is inside it; returns whether the click was consumed
    pub fn check_click(&mut self, pos: Vec2) -> bool {
        if self.active && self.rect.contains(pos) {
            self.hide();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_short_message_uses_minimum_size() {
        let mut popup = Popup::default();
        popup.show("Hi", palette::RED, BOARD);
        assert!(popup.active);
        assert_eq!(popup.rect, Rect::new(300.0, 200.0, 200.0, 80.0));
        assert_eq!(popup.color, palette::RED);
    }

    #[test]
    fn test_long_message_grows_and_stays_centered() {
        let mut popup = Popup::default();
        popup.show("You landed in Off Roading Only!", palette::YELLOW, BOARD);
        // 31 chars * 18 px + 40 padding
        assert_eq!(popup.rect.w, 598.0);
        assert_eq!(popup.rect.x, 101.0);
        assert_eq!(popup.rect.y, 200.0);
    }

    #[test]
    fn test_click_inside_dismisses() {
        let mut popup = Popup::default();
        popup.show("Hi", palette::RED, BOARD);

        assert!(!popup.check_click(Vec2::new(10.0, 10.0)));
        assert!(popup.active);

        assert!(popup.check_click(popup.rect.center()));
        assert!(!popup.active);

        // Hidden popups never consume clicks
        assert!(!popup.check_click(popup.rect.center()));
    }
}
