//! Color palette and bin gradients
//!
//! Colors are stored as 8-bit sRGB and converted for the GPU on demand.

use serde::{Deserialize, Serialize};

/// An 8-bit sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Linear-space RGBA for an sRGB render target
    pub fn to_linear(self) -> [f32; 4] {
        self.with_alpha(1.0)
    }

    pub fn with_alpha(self, alpha: f32) -> [f32; 4] {
        [
            srgb_to_linear(self.0),
            srgb_to_linear(self.1),
            srgb_to_linear(self.2),
            alpha,
        ]
    }

    /// CSS `rgb()` string for DOM overlays
    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

fn srgb_to_linear(channel: u8) -> f32 {
    let c = channel as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Named colors
pub mod palette {
    use super::Rgb;

    pub const BACKGROUND: Rgb = Rgb(19, 33, 45);
    pub const RED: Rgb = Rgb(250, 1, 62);
    pub const YELLOW: Rgb = Rgb(252, 192, 2);
    pub const DARK_RED: Rgb = Rgb(146, 0, 7);
    pub const DARK_YELLOW: Rgb = Rgb(155, 120, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const GRAY: Rgb = Rgb(128, 128, 128);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const GREEN: Rgb = Rgb(32, 250, 32);
    pub const HOVER_GREEN: Rgb = Rgb(24, 200, 24);
    pub const DARK_GREEN: Rgb = Rgb(16, 150, 16);

    // Board
    pub const BOARD: Rgb = Rgb(195, 177, 225);
    pub const TITLE: Rgb = Rgb(128, 0, 128);
    pub const PIN: Rgb = Rgb(159, 43, 104);
    pub const BALL: Rgb = Rgb(112, 41, 99);
    pub const BIN: Rgb = Rgb(255, 165, 0);
    pub const BIN_SHADOW: Rgb = Rgb(200, 120, 0);
    pub const POPUP: Rgb = Rgb(128, 0, 128);
    pub const EDITOR_OVERLAY: Rgb = Rgb(40, 40, 40);
}

/// Name → color lookup table
pub const PALETTE: &[(&str, Rgb)] = &[
    ("background", palette::BACKGROUND),
    ("red", palette::RED),
    ("yellow", palette::YELLOW),
    ("dark_red", palette::DARK_RED),
    ("dark_yellow", palette::DARK_YELLOW),
    ("white", palette::WHITE),
    ("gray", palette::GRAY),
    ("black", palette::BLACK),
    ("green", palette::GREEN),
    ("hover_green", palette::HOVER_GREEN),
    ("dark_green", palette::DARK_GREEN),
    ("board", palette::BOARD),
    ("title", palette::TITLE),
    ("pin", palette::PIN),
    ("ball", palette::BALL),
    ("bin", palette::BIN),
    ("bin_shadow", palette::BIN_SHADOW),
    ("popup", palette::POPUP),
    ("editor_overlay", palette::EDITOR_OVERLAY),
];

/// CSS custom properties (`--dark-red: rgb(146, 0, 7);`) for every palette entry
///
/// The web build sets these on the document root so the DOM overlay shares
/// the board's colors.
pub fn css_custom_properties() -> String {
    PALETTE
        .iter()
        .map(|(name, color)| format!("--{}: {};", name.replace('_', "-"), color.to_css()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Linear gradient of `steps` colors from `start` to `end` inclusive
///
/// Channels are truncated, not rounded.
pub fn rgb_gradient(start: Rgb, end: Rgb, steps: usize) -> Vec<Rgb> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let span = (steps - 1) as f32;
            let channel = |a: u8, b: u8, i: usize| {
                (a as f32 + (b as f32 - a as f32) * i as f32 / span) as u8
            };
            (0..steps)
                .map(|i| {
                    Rgb(
                        channel(start.0, end.0, i),
                        channel(start.1, end.1, i),
                        channel(start.2, end.2, i),
                    )
                })
                .collect()
        }
    }
}

/// Gradient of exactly `count` colors running start → end → start
fn mirrored_gradient(start: Rgb, end: Rgb, count: usize) -> Vec<Rgb> {
    let mut colors = rgb_gradient(start, end, count.div_ceil(2));
    // Odd counts share the middle color
    let tail: Vec<Rgb> = colors.iter().rev().skip(count % 2).copied().collect();
    colors.extend(tail);
    colors
}

/// Bin face colors and their darker shadow colors, one per bin
pub fn bin_gradients(bin_count: usize) -> (Vec<Rgb>, Vec<Rgb>) {
    (
        mirrored_gradient(palette::RED, palette::YELLOW, bin_count),
        mirrored_gradient(palette::DARK_RED, palette::DARK_YELLOW, bin_count),
    )
}
