//! Collision detection and response for the ball
//!
//! Pins are circles and the side walls are vertical lines, so every contact
//! reduces to a normal and a penetration depth.

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone, Copy)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Surface normal at the contact, pointing toward the ball center
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Circle-circle overlap between the ball and a pin
///
/// A ball centered exactly on the pin is pushed straight up.
pub fn ball_pin_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    pin_pos: Vec2,
    pin_radius: f32,
) -> CollisionResult {
    let offset = ball_pos - pin_pos;
    let radius_sum = ball_radius + pin_radius;
    let dist_sq = offset.length_squared();

    if dist_sq >= radius_sum * radius_sum {
        return CollisionResult::miss();
    }

    let normal = offset.normalize_or(Vec2::NEG_Y);
    CollisionResult {
        hit: true,
        normal,
        penetration: radius_sum - dist_sq.sqrt(),
    }
}

/// Check the ball against the left (x = 0) and right (x = board_width) walls
pub fn ball_side_wall_collision(ball_pos: Vec2, ball_radius: f32, board_width: f32) -> CollisionResult {
    if ball_pos.x - ball_radius < 0.0 {
        CollisionResult {
            hit: true,
            normal: Vec2::X,
            penetration: ball_radius - ball_pos.x,
        }
    } else if ball_pos.x + ball_radius > board_width {
        CollisionResult {
            hit: true,
            normal: Vec2::NEG_X,
            penetration: ball_pos.x + ball_radius - board_width,
        }
    } else {
        CollisionResult::miss()
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Velocity after bouncing off a pin
///
/// Reflects only while the ball approaches the surface, then keeps
/// `elasticity` of the normal component and `elasticity * tangential_damping`
/// of the tangential one.
pub fn bounce(velocity: Vec2, normal: Vec2, elasticity: f32, tangential_damping: f32) -> Vec2 {
    let reflected = if velocity.dot(normal) < 0.0 {
        reflect_velocity(velocity, normal)
    } else {
        velocity
    };

    let normal_part = normal * reflected.dot(normal);
    let tangent_part = reflected - normal_part;
    normal_part * elasticity + tangent_part * (elasticity * tangential_damping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_ball_pin_collision_hit() {
        let pin = Vec2::new(100.0, 100.0);
        let result = ball_pin_collision(Vec2::new(100.0, 88.0), 10.0, pin, 5.0);
        assert!(result.hit);
        assert!((result.penetration - 3.0).abs() < 1e-4);
        // Ball is above the pin, so the normal points up
        assert!((result.normal - Vec2::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn test_ball_pin_collision_miss_when_touching() {
        let pin = Vec2::new(100.0, 100.0);
        assert!(!ball_pin_collision(Vec2::new(115.0, 100.0), 10.0, pin, 5.0).hit);
        assert!(!ball_pin_collision(Vec2::new(150.0, 60.0), 10.0, pin, 5.0).hit);
    }

    #[test]
    fn test_ball_pin_collision_coincident_centers() {
        let pin = Vec2::new(10.0, 10.0);
        let result = ball_pin_collision(pin, 10.0, pin, 5.0);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::NEG_Y);
        assert_eq!(result.penetration, 15.0);
    }

    #[test]
    fn test_side_walls() {
        let left = ball_side_wall_collision(Vec2::new(4.0, 50.0), 10.0, 800.0);
        assert!(left.hit);
        assert_eq!(left.normal, Vec2::X);
        assert_eq!(left.penetration, 6.0);

        let right = ball_side_wall_collision(Vec2::new(795.0, 50.0), 10.0, 800.0);
        assert!(right.hit);
        assert_eq!(right.normal, Vec2::NEG_X);

        assert!(!ball_side_wall_collision(Vec2::new(400.0, 50.0), 10.0, 800.0).hit);
        assert!(!ball_side_wall_collision(Vec2::new(10.0, 50.0), 10.0, 800.0).hit);
    }

    #[test]
    fn test_bounce_head_on() {
        // Falling straight onto the top of a pin
        let out = bounce(Vec2::new(0.0, 4.0), Vec2::NEG_Y, 0.65, 0.5);
        assert!((out - Vec2::new(0.0, -2.6)).length() < 1e-5);
    }

    #[test]
    fn test_bounce_damps_tangent_more() {
        let out = bounce(Vec2::new(2.0, 2.0), Vec2::NEG_Y, 0.65, 0.5);
        assert!((out.y - (-1.3)).abs() < 1e-5);
        assert!((out.x - 0.65).abs() < 1e-5);
    }

    #[test]
    fn test_bounce_separating_is_not_reflected() {
        // Already moving away from the pin: direction is kept, speed damped
        let out = bounce(Vec2::new(0.0, -3.0), Vec2::NEG_Y, 0.65, 0.5);
        assert!(out.y < 0.0);
        assert!((out.y - (-1.95)).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_bounce_never_gains_normal_speed(
            vx in -30.0f32..30.0,
            vy in -30.0f32..30.0,
            angle in 0.0f32..std::f32::consts::TAU,
            elasticity in 0.0f32..=1.0,
        ) {
            let normal = Vec2::from_angle(angle);
            let velocity = Vec2::new(vx, vy);
            let out = bounce(velocity, normal, elasticity, 0.5);

            let before = velocity.dot(normal).abs();
            let after = out.dot(normal).abs();
            prop_assert!(after <= before + 1e-4, "normal speed grew: {before} -> {after}");
            prop_assert!(out.length() <= velocity.length() + 1e-4);
        }

        #[test]
        fn prop_pin_normal_is_unit_and_points_at_ball(
            dx in -14.0f32..14.0,
            dy in -14.0f32..14.0,
        ) {
            let pin = Vec2::new(200.0, 200.0);
            let ball = pin + Vec2::new(dx, dy);
            let result = ball_pin_collision(ball, 10.0, pin, 5.0);
            if result.hit {
                prop_assert!((result.normal.length() - 1.0).abs() < 1e-4);
                prop_assert!(result.penetration > 0.0);
                let offset = ball - pin;
                if offset.length_squared() > 1e-6 {
                    prop_assert!(result.normal.dot(offset) > 0.0);
                }
            }
        }
    }
}
