//! Plinko - drop a ball through a triangle of pins into labeled bins
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball physics, board geometry, host tick)
//! - `ui`: Editor, popup and letterbox state (no drawing)
//! - `renderer`: WebGPU rendering pipeline and scene building
//! - `settings`: JSON configuration

pub mod colors;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use error::{PlinkoError, Result};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate; ball physics is expressed in units per tick
    pub const TICK_RATE_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Board design size (board-space pixels)
    pub const BASE_WIDTH: f32 = 800.0;
    pub const BASE_HEIGHT: f32 = 600.0;

    /// Vertical position of the first pin row
    pub const PIN_GRID_TOP: f32 = 50.0;
    /// Pin spacing never grows past this, however few rows there are
    pub const MAX_PIN_SPACING: f32 = 50.0;

    /// Row count limits accepted by the editor and settings
    pub const MIN_PIN_ROWS: u32 = 2;
    pub const MAX_PIN_ROWS: u32 = 15;
    /// Row count used when the editor text is not a number
    pub const FALLBACK_PIN_ROWS: u32 = 8;
    pub const DEFAULT_PIN_ROWS: u32 = 6;

    /// A ball still falling after this many ticks is resolved to the nearest bin
    pub const MAX_FLIGHT_TICKS: u32 = 2000;
    /// How long a bin stays pressed after being hit
    pub const HIGHLIGHT_TICKS: u32 = 12;

    /// Popup text size used for sizing the popup box
    pub const POPUP_FONT_PX: f32 = 36.0;
}
