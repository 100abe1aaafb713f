//! Tinct
//!
//! Dominant color extraction for in-memory images, with interchangeable CPU
//! and GPU strategies behind one interface.
//!
//! # Features
//!
//! - Normalization of arbitrary input images to upright sRGB RGBA8
//! - High-quality downsampling to a fixed extraction resolution
//! - GPU per-pixel channel accumulation via wgpu compute shaders
//!   (Metal on macOS, Vulkan on Linux), with blocking readback
//! - CPU fallback producing the same mean within 8-bit tolerance
//! - Brightness floor so results stay legible against dark backgrounds
//!
//! # Example
//!
//! ```no_run
//! use tinct::{extract_dominant_color, ExtractConfig, SourceImage};
//!
//! # async fn run() -> Result<(), tinct::ExtractError> {
//! let photo = image::open("photo.jpg").expect("decode");
//! let source = SourceImage::srgb(photo);
//! let color = extract_dominant_color(source, &ExtractConfig::default()).await?;
//! println!("swatch: {}", color.to_hex());
//! # Ok(())
//! # }
//! ```

pub mod color;
pub mod extract;
pub mod gpu;
pub mod image;
pub mod pipeline;

// Re-export commonly used types
pub use color::{apply_brightness_floor, parse_hex_color, Rgb};
pub use extract::{ColorExtract, CpuExtractor, DynamicExtractor, ExtractorError, GpuExtractorWrapper};
pub use gpu::{ChannelAccumulator, GpuColorExtractor, GpuContext, GpuError, GpuExtractError};
pub use crate::image::{
    downsample, normalize, ColorSpace, DownsampleError, NormalizeError, Orientation, SourceImage,
    DEFAULT_TARGET_SIZE,
};
pub use pipeline::{
    create_extractor, dominant_color, extract_dominant_color, ExtractConfig, ExtractError, Stage,
    Strategy,
};
