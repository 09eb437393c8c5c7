use crate::error::RenderError;
use crate::render::RenderCtx;

use super::{ImageData, TextureHandle, TextureId};

/// An immutable RGBA8 texture on the GPU.
///
/// Cloning shares the underlying GPU texture.
#[derive(Debug, Clone)]
pub struct Texture {
    id: TextureId,
    width: u32,
    height: u32,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl Texture {
    /// Uploads decoded pixels.
    pub fn from_image(ctx: &RenderCtx<'_>, image: &ImageData<'_>) -> Result<Self, RenderError> {
        let rgba = image.to_rgba8()?;

        let max = ctx.device.limits().max_texture_dimension_2d;
        if image.width > max || image.height > max {
            return Err(RenderError::InvalidImageData(format!(
                "{}x{} exceeds the device limit of {max} pixels per side",
                image.width, image.height
            )));
        }

        Ok(Self::upload(ctx.device, ctx.queue, &rgba, image.width, image.height))
    }

    /// A 1x1 texture of a single colour.
    pub fn solid(device: &wgpu::Device, queue: &wgpu::Queue, rgba: [u8; 4]) -> Self {
        Self::upload(device, queue, &rgba, 1, 1)
    }

    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &[u8],
        width: u32,
        height: u32,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("quadra texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let id = TextureId::next();
        log::trace!("texture {id:?} uploaded ({width}x{height})");

        Self {
            id,
            width,
            height,
            texture,
            view,
        }
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Frees the GPU memory now rather than when the last clone drops.
    pub fn destroy(self) {
        self.texture.destroy();
    }
}

impl TextureHandle for Texture {
    #[inline]
    fn id(&self) -> TextureId {
        self.id
    }

    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }
}
