//! GPU-accelerated channel accumulation using wgpu compute shaders.

use image::RgbaImage;
use std::sync::Arc;
use wgpu::{Device, Queue};

use super::buffers::ExtractBuffers;
use super::params::{ChannelAccumulator, ExtractParams};
use super::pipelines::{KernelError, PipelineCache, KERNEL_ACCUMULATE};
use crate::gpu::textures::SourceTexture;

/// Workgroup dimensions of the accumulation kernel.
/// Must stay in sync with `@workgroup_size` in dominant_color.wgsl; the
/// dispatch grid is derived from this by ceiling division so every pixel is
/// covered exactly once.
const WORKGROUP_DIM: u32 = 16;

/// Errors that can occur during GPU extraction.
#[derive(Debug, thiserror::Error)]
pub enum GpuExtractError {
    #[error("Extraction target size must be non-zero")]
    ZeroTargetSize,
    #[error("Extraction target {target} exceeds the device texture limit {max}")]
    TargetExceedsDeviceLimit { target: u32, max: u32 },
    #[error(transparent)]
    Kernel(#[from] KernelError),
    #[error("GPU buffer mapping failed: {0}")]
    BufferMapFailed(String),
}

/// GPU-backed channel accumulator.
///
/// Owns a fixed-size source texture and accumulator buffers sized to the
/// extraction resolution; one instance serves many requests, one at a time.
pub struct GpuColorExtractor {
    device: Arc<Device>,
    queue: Arc<Queue>,
    texture: SourceTexture,
    buffers: ExtractBuffers,
    pipelines: PipelineCache,
    alpha_threshold: f32,
}

impl GpuColorExtractor {
    /// Create a new extractor for square images of `target_size` pixels.
    pub fn new(
        device: Arc<Device>,
        queue: Arc<Queue>,
        target_size: u32,
        alpha_threshold: f32,
    ) -> Result<Self, GpuExtractError> {
        if target_size == 0 {
            return Err(GpuExtractError::ZeroTargetSize);
        }
        let max = device.limits().max_texture_dimension_2d;
        if target_size > max {
            return Err(GpuExtractError::TargetExceedsDeviceLimit {
                target: target_size,
                max,
            });
        }

        let texture = SourceTexture::new(&device, target_size, target_size);
        let buffers = ExtractBuffers::new(&device, texture.pixel_count());
        let pipelines = PipelineCache::new(device.clone());

        Ok(Self {
            device,
            queue,
            texture,
            buffers,
            pipelines,
            alpha_threshold,
        })
    }

    pub fn target_size(&self) -> u32 {
        self.texture.dimensions().0
    }

    /// Run the per-pixel kernel over `pixels` and reduce the readback records
    /// to channel totals.
    ///
    /// Blocks until the GPU pass completes; there is no overlap between
    /// kernel execution and result consumption within one request.
    pub fn accumulate(&mut self, pixels: &RgbaImage) -> Result<ChannelAccumulator, GpuExtractError> {
        let (width, height) = self.texture.dimensions();
        self.texture.upload(&self.queue, pixels);

        let params = ExtractParams::new(width, height, self.alpha_threshold);
        self.queue
            .write_buffer(&self.buffers.params, 0, bytemuck::bytes_of(&params));

        let pipeline = self.pipelines.pipeline(KERNEL_ACCUMULATE)?;

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("extract_bind_group"),
            layout: self.pipelines.layout(),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(self.texture.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: self.buffers.accumulators.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.buffers.params.as_entire_binding(),
                },
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("extract_encoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("accumulate_pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(
                width.div_ceil(WORKGROUP_DIM),
                height.div_ceil(WORKGROUP_DIM),
                1,
            );
        }
        let records_size = self.texture.pixel_count() as u64 * ChannelAccumulator::SIZE;
        encoder.copy_buffer_to_buffer(
            &self.buffers.accumulators,
            0,
            &self.buffers.staging,
            0,
            records_size,
        );
        self.queue.submit(Some(encoder.finish()));

        let records = self.read_staging()?;
        assert_eq!(
            records.len(),
            self.texture.pixel_count(),
            "accumulator buffer length must equal width * height"
        );

        Ok(sum_records(&records))
    }

    fn read_staging(&self) -> Result<Vec<ChannelAccumulator>, GpuExtractError> {
        let slice = self.buffers.staging.slice(..);

        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |r| {
            let _ = tx.send(r);
        });
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .unwrap();

        rx.recv()
            .map_err(|e| GpuExtractError::BufferMapFailed(e.to_string()))?
            .map_err(|e| GpuExtractError::BufferMapFailed(format!("{:?}", e)))?;

        let data = slice.get_mapped_range();
        let records: Vec<ChannelAccumulator> = bytemuck::cast_slice(&data).to_vec();
        drop(data);
        self.buffers.staging.unmap();

        Ok(records)
    }
}

/// Sum per-pixel records into one running total.
pub fn sum_records(records: &[ChannelAccumulator]) -> ChannelAccumulator {
    let mut total = ChannelAccumulator {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        n: 0.0,
    };
    for record in records {
        total.r += record.r;
        total.g += record.g;
        total.b += record.b;
        total.n += record.n;
    }
    total
}
