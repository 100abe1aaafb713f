//! Color result type and shared reduction rules.
//!
//! Both extraction strategies produce an [`Rgb`] and run it through the same
//! brightness floor, so CPU and GPU results stay comparable.

use serde::{Deserialize, Serialize};

/// Final extraction result: an RGB color with components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from 8-bit channel values.
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Quantize back to 8-bit channels (for painting a swatch).
    pub fn to_u8(self) -> [u8; 3] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }

    /// Mean perceptual brightness: plain channel average.
    pub fn brightness(self) -> f32 {
        (self.r + self.g + self.b) / 3.0
    }

    /// Format as a `#rrggbb` hex string.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_u8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

/// Parse hex color to RGB (accepts 6-char RGB or 8-char RGBA, alpha is ignored).
pub fn parse_hex_color(hex: &str) -> Option<Rgb> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 && hex.len() != 8 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Rgb::from_u8(r, g, b))
}

/// Lift a dark mean color so it stays legible against dark backgrounds.
///
/// If the mean brightness is below `floor`, every channel is scaled by
/// `floor / brightness` and clamped to 1.0. A pure-black input has no hue to
/// scale, so it lifts to neutral gray at the floor.
pub fn apply_brightness_floor(color: Rgb, floor: f32) -> Rgb {
    let brightness = color.brightness();
    if brightness >= floor {
        return color;
    }
    if brightness <= f32::EPSILON {
        return Rgb::new(floor, floor, floor);
    }
    let scale = floor / brightness;
    Rgb::new(
        (color.r * scale).min(1.0),
        (color.g * scale).min(1.0),
        (color.b * scale).min(1.0),
    )
}
