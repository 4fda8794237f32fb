use crate::error::{scoped, RenderError};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use wgpu::util::DeviceExt;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("can't decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

const FALLBACK_SIZE: u32 = 64;
const FALLBACK_CELL: u32 = 8;

pub fn decode_rgba(path: impl AsRef<Path>) -> Result<RgbaImage, TextureError> {
    let path = path.as_ref();
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

/// Magenta and black squares, used when an image can't be loaded.
pub fn checkerboard(size: u32, cell: u32) -> RgbaImage {
    let cell = cell.max(1);
    RgbaImage::from_fn(size, size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            image::Rgba([255, 0, 255, 255])
        } else {
            image::Rgba([0, 0, 0, 255])
        }
    })
}

/// A sampled 2D texture. The GPU texture is destroyed on drop.
#[derive(Debug)]
pub struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl GpuTexture {
    /// Decode `path` into an sRGB texture. A missing or undecodable image is
    /// not fatal: it is logged and replaced by a checkerboard.
    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
    ) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let rgba = decode_rgba(path).unwrap_or_else(|err| {
            tracing::warn!(%err, "using fallback texture");
            checkerboard(FALLBACK_SIZE, FALLBACK_CELL)
        });
        let label = path.display().to_string();
        Self::from_rgba(device, queue, &label, &rgba)
    }

    pub fn fallback(device: &wgpu::Device, queue: &wgpu::Queue) -> Result<Self, RenderError> {
        Self::from_rgba(
            device,
            queue,
            "fallback",
            &checkerboard(FALLBACK_SIZE, FALLBACK_CELL),
        )
    }

    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        rgba: &RgbaImage,
    ) -> Result<Self, RenderError> {
        Self::create(
            device,
            queue,
            label,
            rgba.dimensions(),
            wgpu::TextureFormat::Rgba8UnormSrgb,
            rgba.as_raw(),
            wgpu::FilterMode::Linear,
            wgpu::AddressMode::Repeat,
        )
    }

    /// Single-channel coverage texture for one glyph bitmap.
    pub fn glyph(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        size: (u32, u32),
        coverage: &[u8],
    ) -> Result<Self, RenderError> {
        Self::create(
            device,
            queue,
            label,
            size,
            wgpu::TextureFormat::R8Unorm,
            coverage,
            wgpu::FilterMode::Linear,
            wgpu::AddressMode::ClampToEdge,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn create(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        (width, height): (u32, u32),
        format: wgpu::TextureFormat,
        data: &[u8],
        filter: wgpu::FilterMode,
        address: wgpu::AddressMode,
    ) -> Result<Self, RenderError> {
        scoped(device, format!("texture {label}"), || {
            let texture = device.create_texture_with_data(
                queue,
                &wgpu::TextureDescriptor {
                    label: Some(label),
                    size: wgpu::Extent3d {
                        width,
                        height,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                    view_formats: &[],
                },
                wgpu::util::TextureDataOrder::LayerMajor,
                data,
            );
            let view = texture.create_view(&Default::default());
            let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some(label),
                address_mode_u: address,
                address_mode_v: address,
                mag_filter: filter,
                min_filter: filter,
                ..Default::default()
            });
            Self {
                texture,
                view,
                sampler,
            }
        })
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    pub fn size(&self) -> wgpu::Extent3d {
        self.texture.size()
    }
}

impl Drop for GpuTexture {
    fn drop(&mut self) {
        self.texture.destroy();
    }
}
