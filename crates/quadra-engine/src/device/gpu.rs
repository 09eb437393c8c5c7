use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface::{choose_alpha_mode, choose_surface_format};
use super::{GpuInit, SurfaceErrorAction};
use crate::coords::Viewport;
use crate::render::{RenderCtx, RenderTarget};

/// Owns wgpu core objects and the surface configuration.
pub struct Gpu<'w> {
    /// Surface bound to the window; the window must outlive the `Gpu`.
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,
}

/// A single acquired swapchain image.
///
/// Holding it blocks acquisition of the next one; hand it back through
/// [`Gpu::present`] once all work on it is submitted.
pub struct GpuFrame {
    surface_texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    size: PhysicalSize<u32>,
}

impl GpuFrame {
    /// Render target covering the whole frame.
    pub fn target(&self) -> RenderTarget {
        RenderTarget::new(self.view.clone(), self.size.width, self.size.height)
    }
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a window.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let available = adapter.limits();
        anyhow::ensure!(
            available.max_sampled_textures_per_shader_stage
                >= init.required_limits.max_sampled_textures_per_shader_stage,
            "adapter supports {} sampled textures per stage, batch rendering needs {}",
            available.max_sampled_textures_per_shader_stage,
            init.required_limits.max_sampled_textures_per_shader_stage,
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("quadra-engine device"),
                required_features: init.required_features,
                required_limits: init.required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&caps.formats, init.prefer_srgb)
            .context("no supported surface formats")?;
        let alpha_mode = choose_alpha_mode(&caps.alpha_modes, init.alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: init.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        surface.configure(&device, &config);

        log::info!(
            "gpu ready: {} ({:?}), surface {:?}",
            adapter.get_info().name,
            adapter.get_info().backend,
            format
        );

        Ok(Gpu {
            surface,
            device,
            queue,
            config,
            size,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Renderer-facing view of this context.
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(
            &self.device,
            &self.queue,
            self.config.format,
            Viewport::new(self.size.width as f32, self.size.height as f32),
        )
    }

    /// Reconfigures the surface after a resize.
    ///
    /// A 0x0 size (minimised window) only updates the stored size.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Acquires the next swapchain image.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Ok(GpuFrame {
            surface_texture,
            view,
            size: PhysicalSize::new(self.config.width, self.config.height),
        })
    }

    /// Presents a frame whose work has been submitted.
    pub fn present(&self, frame: GpuFrame) {
        drop(frame.view);
        frame.surface_texture.present();
    }

    /// Reacts to a failed acquisition.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        let action = SurfaceErrorAction::for_error(&err);
        if action == SurfaceErrorAction::Reconfigured && self.size.width > 0 && self.size.height > 0 {
            self.surface.configure(&self.device, &self.config);
        }
        action
    }
}
