//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (physics is expressed per tick)
//! - Seeded RNG only
//! - Pins derived from geometry, never stored
//! - No rendering or platform dependencies

pub mod ball;
pub mod bins;
pub mod board;
pub mod collision;
pub mod state;
pub mod tick;
pub mod tuning;

pub use ball::Ball;
pub use bins::BinRegistry;
pub use board::{BinIndex, BoardGeometry};
pub use collision::{CollisionResult, ball_pin_collision, ball_side_wall_collision, bounce};
pub use state::{GameEvent, GameState};
pub use tick::{TickInput, tick};
pub use tuning::PhysicsTuning;
