//! GPU buffer management for the extraction kernel.

use wgpu::{Buffer, BufferUsages, Device};

use super::params::ChannelAccumulator;

/// Buffers for one extractor, allocated once at the fixed extraction
/// resolution and reused across requests.
pub struct ExtractBuffers {
    /// One `ChannelAccumulator` slot per pixel, written by the kernel.
    pub accumulators: Buffer,
    /// CPU-mappable copy target for readback.
    pub staging: Buffer,
    /// Kernel uniform parameters.
    pub params: Buffer,
}

impl ExtractBuffers {
    /// Create all buffers sized for `pixel_count` accumulator records.
    pub fn new(device: &Device, pixel_count: usize) -> Self {
        let records_size = pixel_count as u64 * ChannelAccumulator::SIZE;

        let accumulators = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("extract_accumulators"),
            size: records_size,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("extract_staging"),
            size: records_size,
            usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let params = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("extract_params"),
            size: 16,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            accumulators,
            staging,
            params,
        }
    }
}
