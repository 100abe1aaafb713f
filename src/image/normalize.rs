//! Normalization to upright, sRGB, RGBA8.
//!
//! Three conditional corrections compose in a fixed order: orientation, then
//! color space, then pixel layout. Each is skipped when the image already
//! satisfies it, so a canonical image passes through unchanged.

use image::{DynamicImage, RgbaImage};

use super::{Orientation, SourceImage};

/// Errors from normalization. All are terminal for the current request.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("Image has zero width or height")]
    EmptyImage,
    #[error("Canvas dimensions {width}x{height} exceed the supported pixel count")]
    CanvasTooLarge { width: u32, height: u32 },
}

/// Largest canvas the pipeline will rasterize into. Anything bigger than this
/// cannot have come from a photo picker and would make intermediate canvases
/// allocate gigabytes.
const MAX_CANVAS_PIXELS: u64 = 1 << 30;

fn check_canvas(width: u32, height: u32) -> Result<(), NormalizeError> {
    if width == 0 || height == 0 {
        return Err(NormalizeError::EmptyImage);
    }
    if u64::from(width) * u64::from(height) > MAX_CANVAS_PIXELS {
        return Err(NormalizeError::CanvasTooLarge { width, height });
    }
    Ok(())
}

/// Re-rasterize `image` upright according to its stored orientation.
///
/// Rotation cases swap the canvas dimensions; the transposed and transverse
/// cases rotate first and then mirror, matching the EXIF definitions.
fn apply_orientation(image: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Upright => image,
        Orientation::FlipHorizontal => image.fliph(),
        Orientation::Rotate180 => image.rotate180(),
        Orientation::FlipVertical => image.flipv(),
        Orientation::Rotate90 => image.rotate90(),
        Orientation::Rotate90FlipH => image.rotate90().fliph(),
        Orientation::Rotate270 => image.rotate270(),
        Orientation::Rotate270FlipH => image.rotate270().fliph(),
    }
}

/// Bring a source image to the canonical pre-upload form: upright, sRGB,
/// 8-bit RGBA with straight alpha.
///
/// An image that is already canonical is returned without re-rendering
/// (identity), and normalizing a normalized image is a no-op (idempotence).
pub fn normalize(source: SourceImage) -> Result<RgbaImage, NormalizeError> {
    let (width, height) = source.dimensions();
    check_canvas(width, height)?;

    // 1. Orientation → upright.
    let mut image = source.data;
    if source.orientation != Orientation::Upright {
        log::debug!(
            "normalizing orientation {:?} for {}x{} image",
            source.orientation,
            width,
            height
        );
        image = apply_orientation(image, source.orientation);
        check_canvas(image.width(), image.height())?;
    }

    // 2. Color space → sRGB. The conversion math runs on 8-bit RGBA channels,
    //    so a non-sRGB image materializes the target layout as a side effect.
    if !source.color_space.is_srgb() {
        log::debug!("converting {:?} to sRGB", source.color_space);
        let converted = super::colorspace::to_srgb(&image.to_rgba8(), source.color_space);
        image = DynamicImage::ImageRgba8(converted);
    }

    // 3. Pixel layout → RGBA8 with straight alpha. An image already in RGBA8
    //    moves through untouched.
    match image {
        DynamicImage::ImageRgba8(buffer) => Ok(buffer),
        other => {
            log::debug!("converting {:?} layout to RGBA8", other.color());
            Ok(other.to_rgba8())
        }
    }
}
