//! Unified extraction strategies for CPU and GPU.
//!
//! Both strategies share one semantic: skip pixels below the alpha
//! threshold, average the rest, and report the mean as the dominant color.
//! The GPU path accumulates per-pixel records with a compute kernel; the CPU
//! path walks the same pixels directly. Either can stand in for the other.

use image::RgbaImage;
use std::sync::Arc;
use wgpu::{Device, Queue};

use crate::color::Rgb;
use crate::gpu::compute::{ChannelAccumulator, GpuColorExtractor, GpuExtractError};

/// Error type for extraction strategy operations.
#[derive(Debug, thiserror::Error)]
pub enum ExtractorError {
    #[error("No pixels above the alpha threshold; nothing to average")]
    NoVisiblePixels,
    #[error(transparent)]
    Gpu(#[from] GpuExtractError),
}

/// Reduce channel totals to a mean color.
///
/// Fails when the counted weight is zero, which happens only for fully
/// transparent input.
pub fn mean_color(total: ChannelAccumulator) -> Result<Rgb, ExtractorError> {
    if total.n <= 0.0 {
        return Err(ExtractorError::NoVisiblePixels);
    }
    Ok(Rgb::new(
        total.r / total.n,
        total.g / total.n,
        total.b / total.n,
    ))
}

/// Trait for strategies that reduce a normalized, downsampled image to its
/// mean color. The brightness floor is applied by the pipeline, not here.
pub trait ColorExtract {
    /// Compute the mean color of the visible pixels.
    fn extract(&mut self, pixels: &RgbaImage) -> Result<Rgb, ExtractorError>;

    /// Whether this strategy runs on the GPU.
    fn is_gpu(&self) -> bool {
        false
    }

    /// The fixed resolution this strategy requires its input at, if any.
    /// The pipeline downsamples to this instead of the configured target so
    /// an extractor built at a different size keeps working.
    fn target_size(&self) -> Option<u32> {
        None
    }
}

/// CPU strategy: a plain pixel loop with the same skip rule as the kernel.
pub struct CpuExtractor {
    alpha_threshold: f32,
}

impl CpuExtractor {
    pub fn new(alpha_threshold: f32) -> Self {
        Self { alpha_threshold }
    }
}

impl ColorExtract for CpuExtractor {
    fn extract(&mut self, pixels: &RgbaImage) -> Result<Rgb, ExtractorError> {
        // f32 accumulation in pixel order, matching the GPU record sum.
        let mut total = ChannelAccumulator {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            n: 0.0,
        };
        for pixel in pixels.pixels() {
            let alpha = pixel[3] as f32 / 255.0;
            if alpha < self.alpha_threshold {
                continue;
            }
            total.r += pixel[0] as f32 / 255.0;
            total.g += pixel[1] as f32 / 255.0;
            total.b += pixel[2] as f32 / 255.0;
            total.n += 1.0;
        }
        mean_color(total)
    }
}

/// Wrapper around [`GpuColorExtractor`] that implements the strategy trait.
pub struct GpuExtractorWrapper {
    inner: GpuColorExtractor,
}

impl GpuExtractorWrapper {
    pub fn new(
        device: Arc<Device>,
        queue: Arc<Queue>,
        target_size: u32,
        alpha_threshold: f32,
    ) -> Result<Self, ExtractorError> {
        let inner = GpuColorExtractor::new(device, queue, target_size, alpha_threshold)?;
        Ok(Self { inner })
    }

    pub fn inner(&self) -> &GpuColorExtractor {
        &self.inner
    }
}

impl ColorExtract for GpuExtractorWrapper {
    fn extract(&mut self, pixels: &RgbaImage) -> Result<Rgb, ExtractorError> {
        let total = self.inner.accumulate(pixels)?;
        mean_color(total)
    }

    fn is_gpu(&self) -> bool {
        true
    }

    fn target_size(&self) -> Option<u32> {
        Some(self.inner.target_size())
    }
}

/// Enum holding either strategy for runtime selection.
pub enum DynamicExtractor {
    Cpu(CpuExtractor),
    Gpu(Box<GpuExtractorWrapper>),
}

impl DynamicExtractor {
    /// Create a CPU-based extractor.
    pub fn cpu(alpha_threshold: f32) -> Self {
        DynamicExtractor::Cpu(CpuExtractor::new(alpha_threshold))
    }

    /// Create a GPU-based extractor.
    pub fn gpu(
        device: Arc<Device>,
        queue: Arc<Queue>,
        target_size: u32,
        alpha_threshold: f32,
    ) -> Result<Self, ExtractorError> {
        Ok(DynamicExtractor::Gpu(Box::new(GpuExtractorWrapper::new(
            device,
            queue,
            target_size,
            alpha_threshold,
        )?)))
    }

    /// Try to create a GPU extractor, falling back to CPU if the GPU is
    /// unavailable.
    pub fn gpu_with_fallback(
        device: Option<Arc<Device>>,
        queue: Option<Arc<Queue>>,
        target_size: u32,
        alpha_threshold: f32,
    ) -> Self {
        match (device, queue) {
            (Some(device), Some(queue)) => {
                match GpuExtractorWrapper::new(device, queue, target_size, alpha_threshold) {
                    Ok(gpu) => DynamicExtractor::Gpu(Box::new(gpu)),
                    Err(e) => {
                        log::warn!("GPU extractor unavailable, falling back to CPU: {}", e);
                        DynamicExtractor::Cpu(CpuExtractor::new(alpha_threshold))
                    }
                }
            }
            _ => DynamicExtractor::Cpu(CpuExtractor::new(alpha_threshold)),
        }
    }
}

impl ColorExtract for DynamicExtractor {
    fn extract(&mut self, pixels: &RgbaImage) -> Result<Rgb, ExtractorError> {
        match self {
            DynamicExtractor::Cpu(e) => e.extract(pixels),
            DynamicExtractor::Gpu(e) => e.extract(pixels),
        }
    }

    fn is_gpu(&self) -> bool {
        matches!(self, DynamicExtractor::Gpu(_))
    }

    fn target_size(&self) -> Option<u32> {
        match self {
            DynamicExtractor::Cpu(_) => None,
            DynamicExtractor::Gpu(e) => e.target_size(),
        }
    }
}
