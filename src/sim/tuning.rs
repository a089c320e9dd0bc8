//! Data-driven physics balance
//!
//! All ball-physics constants live here so they can be overridden from the
//! settings file. Values are per tick (60 Hz), not per second.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Downward acceleration (units/tick²)
    pub gravity: f32,
    /// Fraction of normal velocity kept after a bounce
    pub elasticity: f32,
    /// Extra factor applied to the tangential velocity on pin contact
    pub tangential_damping: f32,
    pub ball_radius: f32,
    pub pin_radius: f32,
    /// Spawn height (board-space y)
    pub spawn_y: f32,
    /// Spawn vx is drawn uniformly from [-spawn_jitter, spawn_jitter]
    pub spawn_jitter: f32,
    /// Distance below the last pin row at which the ball lands
    pub landing_margin: f32,
    /// Extra push-out distance beyond the overlap on pin contact
    pub separation_epsilon: f32,
    /// Ticks during which pin contacts are ignored after one is resolved
    pub pin_cooldown_ticks: u32,
    /// vx nudge toward the center when more than one spacing off-center
    pub center_bias: f32,
    /// Stochastic vx nudge toward the center
    pub random_bias: f32,
    /// Probability of applying `random_bias` on each pin contact
    pub random_bias_chance: f64,
    /// A slow contact whose normal has |x| below this counts as resting on top of the pin
    pub tip_normal_x: f32,
    /// Speed (after the bounce) below which a top contact counts as resting
    pub tip_speed: f32,
    /// vx pushed away from the pin when the ball rests on top of it
    pub tip_nudge: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: 0.2,
            elasticity: 0.65,
            tangential_damping: 0.5,
            ball_radius: 10.0,
            pin_radius: 5.0,
            spawn_y: 20.0,
            spawn_jitter: 0.15,
            landing_margin: 50.0,
            separation_epsilon: 0.5,
            // 50 ms at 60 Hz
            pin_cooldown_ticks: 3,
            center_bias: 0.05,
            random_bias: 0.02,
            random_bias_chance: 0.7,
            tip_normal_x: 0.1,
            tip_speed: 1.0,
            tip_nudge: 0.3,
        }
    }
}
