//! Shape generation for 2D primitives
//!
//! Everything is emitted as a plain triangle list in board space.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use super::vertex::Vertex;
use crate::ui::Rect;

/// Which corners of a rounded rectangle are rounded
///
/// Order: top-left, top-right, bottom-right, bottom-left.
pub type Corners = [bool; 4];

pub const ALL_CORNERS: Corners = [true; 4];

/// Triangle fan from `start` to `end` (radians, y down) around `center`
fn fan(center: Vec2, radius: f32, start: f32, end: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(1);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    let span = end - start;

    for i in 0..segments {
        let theta1 = start + span * i as f32 / segments as f32;
        let theta2 = start + span * (i + 1) as f32 / segments as f32;

        // Triangle from center to edge
        vertices.push(Vertex::at(center, color));
        vertices.push(Vertex::at(center + Vec2::from_angle(theta1) * radius, color));
        vertices.push(Vertex::at(center + Vec2::from_angle(theta2) * radius, color));
    }

    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    fan(center, radius, 0.0, TAU, color, segments)
}

/// Two triangles covering `rect`
pub fn rect(rect: Rect, color: [f32; 4]) -> Vec<Vertex> {
    let (min, max) = (rect.min(), rect.max());
    let top_right = Vec2::new(max.x, min.y);
    let bottom_left = Vec2::new(min.x, max.y);

    vec![
        Vertex::at(min, color),
        Vertex::at(top_right, color),
        Vertex::at(bottom_left, color),
        Vertex::at(bottom_left, color),
        Vertex::at(top_right, color),
        Vertex::at(max, color),
    ]
}

/// Rectangle with quarter-circle corners
///
/// The radius is capped at half the shorter side.
pub fn rounded_rect(r: Rect, radius: f32, corners: Corners, color: [f32; 4]) -> Vec<Vertex> {
    let radius = radius.min(r.w / 2.0).min(r.h / 2.0);
    if radius <= 0.0 {
        return rect(r, color);
    }

    let mut vertices = Vec::with_capacity(18 + 4 * 6 * 3);

    // Full-height middle band, then the two side bands between the corners
    vertices.extend(rect(Rect::new(r.x + radius, r.y, r.w - 2.0 * radius, r.h), color));
    vertices.extend(rect(Rect::new(r.x, r.y + radius, radius, r.h - 2.0 * radius), color));
    vertices.extend(rect(
        Rect::new(r.x + r.w - radius, r.y + radius, radius, r.h - 2.0 * radius),
        color,
    ));

    let left = r.x + radius;
    let right = r.x + r.w - radius;
    let top = r.y + radius;
    let bottom = r.y + r.h - radius;
    let corner_centers = [
        (Vec2::new(left, top), PI),
        (Vec2::new(right, top), PI + FRAC_PI_2),
        (Vec2::new(right, bottom), 0.0),
        (Vec2::new(left, bottom), FRAC_PI_2),
    ];

    for (&rounded, (center, start)) in corners.iter().zip(corner_centers) {
        if rounded {
            vertices.extend(fan(center, radius, start, start + FRAC_PI_2, color, 6));
        } else {
            // Square corner: the quadrant box away from the rectangle center
            let dir = Vec2::from_angle(start + FRAC_PI_2 / 2.0).signum();
            let corner = center + dir * radius;
            let min = center.min(corner);
            vertices.extend(rect(Rect::new(min.x, min.y, radius, radius), color));
        }
    }

    vertices
}
