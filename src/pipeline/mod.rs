//! One-shot extraction pipeline: normalize, downsample, extract, floor.
//!
//! The pipeline is a strictly linear sequence with no retries; any stage
//! failure is terminal for the request and the caller restarts a fresh run.

use crate::color::{apply_brightness_floor, Rgb};
use crate::extract::{ColorExtract, DynamicExtractor, ExtractorError};
use crate::gpu::compute::GpuExtractError;
use crate::gpu::{GpuContext, GpuError};
use crate::image::{downsample, normalize, DownsampleError, NormalizeError, SourceImage};
use serde::{Deserialize, Serialize};

/// Which extraction strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    Cpu,
    /// GPU required; fails when no adapter or device is available.
    Gpu,
    /// GPU preferred, silently degrading to CPU.
    #[default]
    GpuWithFallback,
}

/// Pipeline configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub strategy: Strategy,
    /// Square extraction resolution the image is downsampled to.
    pub target_size: u32,
    /// Pixels with alpha below this are skipped by both strategies.
    pub alpha_threshold: f32,
    /// Minimum mean brightness of the result; darker means are scaled up.
    pub brightness_floor: f32,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            target_size: crate::image::DEFAULT_TARGET_SIZE,
            alpha_threshold: 0.05,
            brightness_floor: 0.5,
        }
    }
}

/// Pipeline stages, used to tag which step a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Normalizing,
    Downsampling,
    Uploading,
    Dispatching,
    Reducing,
}

/// Errors that can occur during pipeline execution.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Normalize error: {0}")]
    Normalize(#[from] NormalizeError),
    #[error("Downsample error: {0}")]
    Downsample(#[from] DownsampleError),
    #[error("GPU context error: {0}")]
    Context(#[from] GpuError),
    #[error("Extraction error: {0}")]
    Extractor(#[from] ExtractorError),
}

impl ExtractError {
    /// The pipeline stage this error aborted.
    pub fn stage(&self) -> Stage {
        match self {
            ExtractError::Normalize(_) => Stage::Normalizing,
            ExtractError::Downsample(_) => Stage::Downsampling,
            // Context and extractor construction failures surface before the
            // kernel runs, while the pipeline is staging GPU resources.
            ExtractError::Context(_) => Stage::Uploading,
            ExtractError::Extractor(ExtractorError::Gpu(
                GpuExtractError::ZeroTargetSize
                | GpuExtractError::TargetExceedsDeviceLimit { .. },
            )) => Stage::Uploading,
            ExtractError::Extractor(ExtractorError::Gpu(GpuExtractError::Kernel(_))) => {
                Stage::Dispatching
            }
            ExtractError::Extractor(ExtractorError::Gpu(GpuExtractError::BufferMapFailed(_))) => {
                Stage::Reducing
            }
            ExtractError::Extractor(ExtractorError::NoVisiblePixels) => Stage::Reducing,
        }
    }
}

/// Build the extractor selected by `config`, acquiring a GPU context when the
/// strategy calls for one.
pub async fn create_extractor(config: &ExtractConfig) -> Result<DynamicExtractor, ExtractError> {
    match config.strategy {
        Strategy::Cpu => Ok(DynamicExtractor::cpu(config.alpha_threshold)),
        Strategy::Gpu => {
            let ctx = GpuContext::new().await?;
            Ok(DynamicExtractor::gpu(
                ctx.device,
                ctx.queue,
                config.target_size,
                config.alpha_threshold,
            )?)
        }
        Strategy::GpuWithFallback => {
            let (device, queue) = match GpuContext::new().await {
                Ok(ctx) => (Some(ctx.device), Some(ctx.queue)),
                Err(e) => {
                    log::warn!("no GPU context, using CPU extraction: {}", e);
                    (None, None)
                }
            };
            Ok(DynamicExtractor::gpu_with_fallback(
                device,
                queue,
                config.target_size,
                config.alpha_threshold,
            ))
        }
    }
}

/// Run the full extraction sequence against an existing extractor.
///
/// Reusing one extractor across calls keeps the GPU pipeline cache and
/// buffers warm; the pipeline itself permits one request in flight at a time.
pub fn dominant_color(
    source: SourceImage,
    extractor: &mut DynamicExtractor,
    config: &ExtractConfig,
) -> Result<Rgb, ExtractError> {
    let (width, height) = source.dimensions();
    log::debug!("normalizing {}x{} source image", width, height);
    let normalized = normalize(source)?;

    // A GPU extractor is built at a fixed resolution; its size wins over the
    // configured one so a mismatched pairing cannot reach the upload assert.
    let target = extractor.target_size().unwrap_or(config.target_size);
    log::debug!("downsampling to {0}x{0}", target);
    let small = downsample(&normalized, target)?;

    log::debug!(
        "extracting mean color on {}",
        if extractor.is_gpu() { "GPU" } else { "CPU" }
    );
    let mean = extractor.extract(&small)?;

    let color = apply_brightness_floor(mean, config.brightness_floor);
    log::info!("dominant color {} (mean {})", color.to_hex(), mean.to_hex());
    Ok(color)
}

/// One-shot convenience: build the configured extractor, run one extraction,
/// and tear everything down with the request.
pub async fn extract_dominant_color(
    source: SourceImage,
    config: &ExtractConfig,
) -> Result<Rgb, ExtractError> {
    let mut extractor = create_extractor(config).await?;
    dominant_color(source, &mut extractor, config)
}
