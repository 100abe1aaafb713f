//! GPU compute using wgpu.
//!
//! Provides the headless device/queue context, the source texture uploader,
//! and the per-pixel accumulation kernel used by the GPU extraction strategy
//! (Metal backend on macOS, Vulkan on Linux).

pub mod compute;
pub mod context;
pub mod textures;

pub use compute::{ChannelAccumulator, GpuColorExtractor, GpuExtractError, KernelError};
pub use context::{GpuContext, GpuError};
pub use textures::{SourceTexture, SOURCE_FORMAT};
