//! Fixed-resolution downsampling.
//!
//! Shrinking to a small square before upload bounds the GPU work no matter
//! how large the picked photo is.

use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Default extraction resolution. 256x256 keeps the accumulator buffer at
/// 64K records while preserving plenty of color information for a mean.
pub const DEFAULT_TARGET_SIZE: u32 = 256;

#[derive(Debug, thiserror::Error)]
pub enum DownsampleError {
    #[error("Downsample target size must be non-zero")]
    ZeroTargetSize,
}

/// Resample a normalized image to exactly `target x target` pixels using
/// Lanczos3. Inputs smaller than the target are scaled up so the output
/// dimensions are always exact.
pub fn downsample(image: &RgbaImage, target: u32) -> Result<RgbaImage, DownsampleError> {
    if target == 0 {
        return Err(DownsampleError::ZeroTargetSize);
    }
    if image.dimensions() == (target, target) {
        return Ok(image.clone());
    }
    Ok(imageops::resize(image, target, target, FilterType::Lanczos3))
}
