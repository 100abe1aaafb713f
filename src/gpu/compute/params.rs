//! Uniform parameters and accumulator records for the extraction kernel.
//!
//! These structs must match the WGSL definitions exactly, including
//! alignment requirements.

/// Extraction kernel parameters.
/// WGSL: struct ExtractParams { width: u32, height: u32, alpha_threshold: f32, _pad: u32 }
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ExtractParams {
    pub width: u32,
    pub height: u32,
    pub alpha_threshold: f32,
    pub _padding: u32,
}

impl ExtractParams {
    pub fn new(width: u32, height: u32, alpha_threshold: f32) -> Self {
        Self {
            width,
            height,
            alpha_threshold,
            _padding: 0,
        }
    }
}

/// One pixel's contribution, as written by the kernel: running channel sums
/// plus a count the reducer divides by.
/// WGSL: vec4<f32> in `array<vec4<f32>>`, 16 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ChannelAccumulator {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Counted weight: 1.0 for visible pixels, 0.0 for skipped ones.
    pub n: f32,
}

impl ChannelAccumulator {
    pub const SIZE: u64 = std::mem::size_of::<ChannelAccumulator>() as u64;
}
