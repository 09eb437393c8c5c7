use crate::coords::Viewport;

/// Renderer-facing context (device/queue + surface format + viewport).
#[derive(Debug, Copy, Clone)]
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub viewport: Viewport, // physical px
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            viewport,
        }
    }
}

/// Colour attachment a frame is drawn into.
///
/// Holds a shared view so a renderer can keep it for the whole frame.
#[derive(Debug, Clone)]
pub struct RenderTarget {
    pub color_view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

impl RenderTarget {
    #[inline]
    pub fn new(color_view: wgpu::TextureView, width: u32, height: u32) -> Self {
        Self {
            color_view,
            width,
            height,
        }
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width as f32, self.height as f32)
    }
}
