//! In-game board editor
//!
//! Holds the text the user is typing (row count and bin labels) and turns
//! button presses into an [`EditorOutcome`] the host acts on.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::Rect;
use crate::consts::{FALLBACK_PIN_ROWS, MAX_PIN_ROWS, MIN_PIN_ROWS};

/// A single editor input, already decoded from the DOM or the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditorAction {
    /// Enter edit mode
    Edit,
    /// Leave edit mode, or drop a ball when already playing
    Play,
    /// Commit the typed values and leave edit mode
    Apply,
    SetRows(String),
    SetLabel { index: usize, text: String },
}

/// What changed while handling a batch of actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorOutcome {
    pub mode_changed: bool,
    pub rows_changed: bool,
    pub labels_changed: bool,
    pub drop_ball: bool,
}

impl EditorOutcome {
    pub fn any(&self) -> bool {
        self.mode_changed || self.rows_changed || self.labels_changed || self.drop_ball
    }
}

/// Parse a row count, clamped to the supported range
pub fn parse_rows(text: &str) -> u32 {
    match text.trim().parse::<i64>() {
        Ok(rows) => rows.clamp(MIN_PIN_ROWS as i64, MAX_PIN_ROWS as i64) as u32,
        Err(_) => FALLBACK_PIN_ROWS,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Editor {
    pub edit_mode: bool,
    /// Row count as typed
    pub rows_text: String,
    /// Bin labels as typed
    pub label_texts: Vec<String>,
    applied_rows: u32,
    applied_labels: Vec<String>,
}

impl Editor {
    pub fn new(rows: u32, labels: &[String]) -> Self {
        Self {
            edit_mode: false,
            rows_text: rows.to_string(),
            label_texts: labels.to_vec(),
            applied_rows: rows,
            applied_labels: labels.to_vec(),
        }
    }

    /// Apply a batch of actions in order
    pub fn handle(&mut self, actions: &[EditorAction]) -> EditorOutcome {
        let mut outcome = EditorOutcome::default();

        for action in actions {
            match action {
                EditorAction::Edit => {
                    if !self.edit_mode {
                        self.edit_mode = true;
                        outcome.mode_changed = true;
                    }
                }
                EditorAction::Play => {
                    if self.edit_mode {
                        self.edit_mode = false;
                        outcome.mode_changed = true;
                    } else {
                        outcome.drop_ball = true;
                    }
                }
                EditorAction::Apply => {
                    if self.edit_mode {
                        self.apply(&mut outcome);
                    }
                }
                EditorAction::SetRows(text) => {
                    if self.edit_mode {
                        self.rows_text = text.clone();
                    }
                }
                EditorAction::SetLabel { index, text } => {
                    if !self.edit_mode {
                        continue;
                    }
                    if let Some(label) = self.label_texts.get_mut(*index) {
                        *label = text.clone();
                    }
                }
            }
        }

        if outcome.any() {
            log::debug!("editor: {:?}", outcome);
        }
        outcome
    }

    fn apply(&mut self, outcome: &mut EditorOutcome) {
        let rows = self.row_value();
        self.rows_text = rows.to_string();
        if rows != self.applied_rows {
            self.applied_rows = rows;
            outcome.rows_changed = true;
        }

        if self.label_texts != self.applied_labels {
            self.applied_labels = self.label_texts.clone();
            outcome.labels_changed = true;
        }

        self.edit_mode = false;
        outcome.mode_changed = true;
    }

    /// Row count from the typed text
    pub fn row_value(&self) -> u32 {
        parse_rows(&self.rows_text)
    }

    pub fn labels(&self) -> &[String] {
        &self.label_texts
    }

    /// Replace the label boxes after the board was rebuilt
    pub fn reset_labels(&mut self, labels: &[String]) {
        self.label_texts = labels.to_vec();
        self.applied_labels = labels.to_vec();
    }
}

/// Board-space placement of the editor controls
pub mod layout {
    use super::*;

    pub const BUTTON_SIZE: Vec2 = Vec2::new(100.0, 40.0);
    pub const ROWS_BOX: Rect = Rect::new(180.0, 20.0, 60.0, 40.0);

    pub fn edit_button(board: Vec2) -> Rect {
        Rect::new(board.x - 120.0, 20.0, BUTTON_SIZE.x, BUTTON_SIZE.y)
    }

    pub fn play_button(board: Vec2) -> Rect {
        Rect::new(board.x - 230.0, 20.0, BUTTON_SIZE.x, BUTTON_SIZE.y)
    }

    pub fn apply_button(board: Vec2) -> Rect {
        Rect::new(board.x - 120.0, board.y - 60.0, BUTTON_SIZE.x, BUTTON_SIZE.y)
    }

    /// Label text box for bin `index`
    pub fn label_box(index: usize) -> Rect {
        Rect::new(20.0, 80.0 + index as f32 * 50.0, 150.0, 40.0)
    }
}
