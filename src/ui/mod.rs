//! Board-space UI state: the editor, the landing popup and the letterbox
//!
//! Nothing in here draws. The renderer and the DOM overlay read this state.

pub mod editor;
pub mod layout;
pub mod popup;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use editor::{Editor, EditorAction, EditorOutcome};
pub use layout::Letterbox;
pub use popup::Popup;

/// Axis-aligned rectangle in board space (y down)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.w, self.y + self.h)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Inclusive on all edges
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    pub fn offset(&self, by: Vec2) -> Self {
        Self::new(self.x + by.x, self.y + by.y, self.w, self.h)
    }
}
