//! Image normalization and downsampling.
//!
//! This module provides:
//! - Source image wrapper carrying declared orientation and color space
//! - Normalization to upright sRGB RGBA8 (orientation → color space → layout)
//! - High-quality downsampling to the fixed extraction resolution

pub mod colorspace;
pub mod downsample;
pub mod normalize;

use image::DynamicImage;

pub use colorspace::ColorSpace;
pub use downsample::{downsample, DownsampleError, DEFAULT_TARGET_SIZE};
pub use normalize::{normalize, NormalizeError};

/// Stored orientation of an image, mirroring the eight EXIF cases.
///
/// The value describes how the stored pixels must be transformed to appear
/// upright, not how they were captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Already upright, no transform needed.
    #[default]
    Upright,
    /// Mirrored along the vertical axis.
    FlipHorizontal,
    /// Rotated 180 degrees.
    Rotate180,
    /// Mirrored along the horizontal axis.
    FlipVertical,
    /// Transposed: upright after rotating 90 degrees clockwise, then
    /// mirroring along the vertical axis.
    Rotate90FlipH,
    /// Rotated 90 degrees clockwise.
    Rotate90,
    /// Transverse: upright after rotating 270 degrees clockwise, then
    /// mirroring along the vertical axis.
    Rotate270FlipH,
    /// Rotated 270 degrees clockwise.
    Rotate270,
}

impl Orientation {
    /// Map an EXIF orientation tag value (1..=8) to an `Orientation`.
    pub fn from_exif(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Upright),
            2 => Some(Self::FlipHorizontal),
            3 => Some(Self::Rotate180),
            4 => Some(Self::FlipVertical),
            5 => Some(Self::Rotate90FlipH),
            6 => Some(Self::Rotate90),
            7 => Some(Self::Rotate270FlipH),
            8 => Some(Self::Rotate270),
            _ => None,
        }
    }

    /// Whether applying this orientation swaps width and height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Self::Rotate90 | Self::Rotate270 | Self::Rotate90FlipH | Self::Rotate270FlipH
        )
    }
}

/// An input image together with its declared orientation and color space.
///
/// Consumed once per extraction request; the pipeline does not retain it.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub data: DynamicImage,
    pub orientation: Orientation,
    pub color_space: ColorSpace,
}

impl SourceImage {
    /// Wrap an already-upright sRGB image.
    pub fn srgb(data: DynamicImage) -> Self {
        Self {
            data,
            orientation: Orientation::Upright,
            color_space: ColorSpace::Srgb,
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_color_space(mut self, color_space: ColorSpace) -> Self {
        self.color_space = color_space;
        self
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.data.width(), self.data.height())
    }
}
