//! Compute shader infrastructure for color extraction.

pub mod buffers;
pub mod extract;
pub mod params;
pub mod pipelines;

pub use extract::{sum_records, GpuColorExtractor, GpuExtractError};
pub use params::{ChannelAccumulator, ExtractParams};
pub use pipelines::{KernelError, PipelineCache, KERNEL_ACCUMULATE};
