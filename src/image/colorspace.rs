//! Color space tags and conversion to sRGB.

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// Declared color space of a source image.
///
/// The extraction kernel reads sRGB-encoded 8-bit channels, so anything else
/// must be converted before upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorSpace {
    #[default]
    Srgb,
    /// Linear-light RGB with sRGB primaries.
    LinearSrgb,
    /// Display P3: sRGB transfer curve over wider DCI-P3 primaries.
    DisplayP3,
}

impl ColorSpace {
    pub fn is_srgb(self) -> bool {
        matches!(self, Self::Srgb)
    }
}

/// sRGB electro-optical transfer: encoded value to linear light.
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Inverse transfer: linear light to sRGB-encoded value.
fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Display P3 to sRGB primaries, applied in linear light.
/// Row-major 3x3 matrix (P3-D65 → sRGB-D65).
const P3_TO_SRGB: [[f32; 3]; 3] = [
    [1.224_94, -0.224_94, 0.0],
    [-0.042_057, 1.042_06, 0.0],
    [-0.019_638, -0.078_636, 1.098_27],
];

fn p3_to_srgb_linear(rgb: [f32; 3]) -> [f32; 3] {
    let mut out = [0.0f32; 3];
    for (row, value) in P3_TO_SRGB.iter().zip(out.iter_mut()) {
        *value = row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2];
    }
    out
}

/// Convert one encoded pixel from `space` to sRGB encoding. Alpha passes
/// through untouched.
fn convert_pixel(pixel: [f32; 4], space: ColorSpace) -> [f32; 4] {
    let [r, g, b, a] = pixel;
    let linear = match space {
        ColorSpace::Srgb => return pixel,
        ColorSpace::LinearSrgb => [r, g, b],
        ColorSpace::DisplayP3 => {
            p3_to_srgb_linear([srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b)])
        }
    };
    [
        linear_to_srgb(linear[0].clamp(0.0, 1.0)),
        linear_to_srgb(linear[1].clamp(0.0, 1.0)),
        linear_to_srgb(linear[2].clamp(0.0, 1.0)),
        a,
    ]
}

/// Re-render an RGBA8 image into sRGB encoding.
///
/// Returns a new buffer of identical dimensions. Call sites skip this entirely
/// when the declared space is already sRGB.
pub fn to_srgb(image: &RgbaImage, space: ColorSpace) -> RgbaImage {
    if space.is_srgb() {
        return image.clone();
    }
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let encoded = [
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
            pixel[3] as f32 / 255.0,
        ];
        let converted = convert_pixel(encoded, space);
        *pixel = Rgba([
            (converted[0].clamp(0.0, 1.0) * 255.0).round() as u8,
            (converted[1].clamp(0.0, 1.0) * 255.0).round() as u8,
            (converted[2].clamp(0.0, 1.0) * 255.0).round() as u8,
            pixel[3],
        ]);
    }
    out
}
