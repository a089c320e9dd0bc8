//! Game settings
//!
//! Loaded from a JSON file by the native runner; the web build uses the
//! defaults with a time-based seed.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{BASE_HEIGHT, BASE_WIDTH, DEFAULT_PIN_ROWS, MAX_PIN_ROWS, MIN_PIN_ROWS};
use crate::error::{PlinkoError, Result};
use crate::sim::board::pin_spacing_for;
use crate::sim::tuning::PhysicsTuning;

/// Bin labels shipped with the game, one per bin of the default board
pub const DEFAULT_BIN_LABELS: [&str; 7] = [
    "Empty Car",
    "Remove Water",
    "Remove Food",
    "Pee off Roof",
    "Off Roading Only",
    "Walking Only",
    "Restart Game",
];

/// Gravity range in which a ball always reaches the bins within 2000 ticks
pub const GRAVITY_RANGE: std::ops::RangeInclusive<f32> = 0.1..=1.0;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Board design size
    pub board_width: f32,
    pub board_height: f32,
    pub pin_rows: u32,
    /// One label per bin (`pin_rows + 1`); other lengths fall back to template labels
    pub bin_labels: Vec<String>,
    /// RNG seed; `None` uses a fixed default
    pub seed: Option<u64>,
    pub physics: PhysicsTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board_width: BASE_WIDTH,
            board_height: BASE_HEIGHT,
            pin_rows: DEFAULT_PIN_ROWS,
            bin_labels: DEFAULT_BIN_LABELS.iter().map(|s| s.to_string()).collect(),
            seed: None,
            physics: PhysicsTuning::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| {
            log::warn!("rejected settings: {}", msg);
            Err(PlinkoError::InvalidSettings(msg))
        };

        if !(MIN_PIN_ROWS..=MAX_PIN_ROWS).contains(&self.pin_rows) {
            return invalid(format!(
                "pin_rows must be in {}..={}, got {}",
                MIN_PIN_ROWS, MAX_PIN_ROWS, self.pin_rows
            ));
        }
        let size_ok = |v: f32| v.is_finite() && v > 0.0;
        if !(size_ok(self.board_width) && size_ok(self.board_height)) {
            return invalid(format!(
                "board size must be positive, got {}x{}",
                self.board_width, self.board_height
            ));
        }

        let physics = &self.physics;
        if !GRAVITY_RANGE.contains(&physics.gravity) {
            return invalid(format!(
                "gravity must be in [{}, {}], got {}",
                GRAVITY_RANGE.start(),
                GRAVITY_RANGE.end(),
                physics.gravity
            ));
        }
        for (name, value) in [
            ("elasticity", physics.elasticity),
            ("tangential_damping", physics.tangential_damping),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("{} must be in [0, 1], got {}", name, value));
            }
        }
        if !(0.0..=1.0).contains(&physics.random_bias_chance) {
            return invalid(format!(
                "random_bias_chance must be in [0, 1], got {}",
                physics.random_bias_chance
            ));
        }
        if !(size_ok(physics.ball_radius) && size_ok(physics.pin_radius)) {
            return invalid(format!(
                "radii must be positive, got ball {} pin {}",
                physics.ball_radius, physics.pin_radius
            ));
        }
        if !physics.spawn_y.is_finite() {
            return invalid(format!("spawn_y must be finite, got {}", physics.spawn_y));
        }
        for (name, value) in [
            ("spawn_jitter", physics.spawn_jitter),
            ("landing_margin", physics.landing_margin),
            ("separation_epsilon", physics.separation_epsilon),
            ("center_bias", physics.center_bias),
            ("random_bias", physics.random_bias),
            ("tip_normal_x", physics.tip_normal_x),
            ("tip_speed", physics.tip_speed),
            ("tip_nudge", physics.tip_nudge),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return invalid(format!("{} must be finite and >= 0, got {}", name, value));
            }
        }
        if physics.tip_nudge <= physics.random_bias {
            return invalid(format!(
                "tip_nudge ({}) must exceed random_bias ({})",
                physics.tip_nudge, physics.random_bias
            ));
        }

        // The editor can switch to any row count, and more rows mean tighter pins
        let spacing = pin_spacing_for(MAX_PIN_ROWS, self.board_width);
        let gap = spacing - 2.0 * physics.pin_radius;
        if gap <= 2.0 * physics.ball_radius {
            return invalid(format!(
                "board_width {} leaves a {} gap between pins at {} rows, ball needs more than {}",
                self.board_width,
                gap,
                MAX_PIN_ROWS,
                2.0 * physics.ball_radius
            ));
        }

        Ok(())
    }
}
