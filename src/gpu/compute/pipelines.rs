//! Compute pipeline creation and caching for extraction kernels.
//!
//! Kernels are addressed by their WGSL entry-point name; that name is the
//! contract between host code and shader code and must match exactly. A
//! compiled pipeline is cached by name and reused across requests.

use std::collections::HashMap;
use std::sync::Arc;
use wgpu::{BindGroupLayout, ComputePipeline, Device, ShaderModule};

/// Entry-point name of the per-pixel accumulation kernel.
pub const KERNEL_ACCUMULATE: &str = "accumulate_channels";

/// Entry points present in the shader library. Lookup of any other name is a
/// distinct error from pipeline construction failing.
const KNOWN_KERNELS: &[&str] = &[KERNEL_ACCUMULATE];

/// Errors from kernel lookup and pipeline construction. Both abort the
/// extraction request without retry.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error("No kernel named {0:?} in the shader library")]
    KernelNotFound(String),
    #[error("Failed to build compute pipeline for {name:?}: {reason}")]
    PipelineConstruction { name: String, reason: String },
}

/// Bind group layout shared by the extraction kernels: source texture,
/// read-write accumulator storage, uniform params.
pub struct ExtractLayout {
    pub bind_group: BindGroupLayout,
    pipeline: wgpu::PipelineLayout,
}

impl ExtractLayout {
    pub fn new(device: &Device) -> Self {
        let bind_group = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("extract_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("extract_pipeline_layout"),
            bind_group_layouts: &[&bind_group],
            immediate_size: 0,
        });

        Self {
            bind_group,
            pipeline,
        }
    }
}

/// Name-keyed cache of compiled compute pipelines.
pub struct PipelineCache {
    device: Arc<Device>,
    shader: ShaderModule,
    layout: ExtractLayout,
    cache: HashMap<&'static str, Arc<ComputePipeline>>,
}

impl PipelineCache {
    /// Compile the shader library once and prepare an empty cache.
    pub fn new(device: Arc<Device>) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("extract_shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!("../shaders/dominant_color.wgsl").into(),
            ),
        });
        let layout = ExtractLayout::new(&device);
        Self {
            device,
            shader,
            layout,
            cache: HashMap::new(),
        }
    }

    pub fn layout(&self) -> &BindGroupLayout {
        &self.layout.bind_group
    }

    /// Get the compiled pipeline for a kernel, building and caching it on
    /// first use.
    pub fn pipeline(&mut self, name: &str) -> Result<Arc<ComputePipeline>, KernelError> {
        let known = KNOWN_KERNELS
            .iter()
            .find(|&&k| k == name)
            .copied()
            .ok_or_else(|| KernelError::KernelNotFound(name.to_string()))?;

        if let Some(pipeline) = self.cache.get(known) {
            log::debug!("reusing cached pipeline for kernel {:?}", known);
            return Ok(pipeline.clone());
        }

        // Construction errors surface through a validation scope instead of
        // the device-wide uncaptured error handler. The scope stays open for
        // as long as the guard lives.
        let scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = self
            .device
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(&format!("{}_pipeline", known)),
                layout: Some(&self.layout.pipeline),
                module: &self.shader,
                entry_point: Some(known),
                compilation_options: Default::default(),
                cache: None,
            });
        if let Some(error) = pollster::block_on(scope.pop()) {
            return Err(KernelError::PipelineConstruction {
                name: known.to_string(),
                reason: error.to_string(),
            });
        }

        let pipeline = Arc::new(pipeline);
        self.cache.insert(known, pipeline.clone());
        Ok(pipeline)
    }
}
