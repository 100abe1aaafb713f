//! Source texture management for the extraction kernel.

use image::RgbaImage;
use wgpu::{Device, Queue, Texture, TextureView};

/// The pixel format the kernel reads. Plain (non-sRGB) Rgba8 keeps texel
/// values bit-equal to the normalized CPU buffer, so both strategies see the
/// same 8-bit data.
pub const SOURCE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// A fixed-size, read-only source texture that owns both texture and view.
///
/// Allocated once per extractor at the extraction resolution and refilled on
/// every request; the texture must outlive its view, so they live together.
pub struct SourceTexture {
    texture: Texture,
    view: TextureView,
    width: u32,
    height: u32,
}

impl SourceTexture {
    /// Create the source texture at the given fixed dimensions.
    pub fn new(device: &Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("extract_source"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SOURCE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            width,
            height,
        }
    }

    /// Upload a downsampled RGBA8 buffer into the texture.
    ///
    /// The buffer dimensions must match the texture; a mismatch is a
    /// programming error in the pipeline, not a runtime condition.
    pub fn upload(&self, queue: &Queue, pixels: &RgbaImage) {
        assert_eq!(
            pixels.dimensions(),
            (self.width, self.height),
            "uploaded buffer does not match texture dimensions"
        );
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.width * 4),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Get the texture view for binding into the compute pass.
    pub fn view(&self) -> &TextureView {
        &self.view
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels, which is also the accumulator record count.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
