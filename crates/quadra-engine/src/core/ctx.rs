use winit::window::Window;

use crate::coords::Viewport;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::InputSource;
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// The application window.
pub struct WindowCtx<'a> {
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a dyn InputSource,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        self.gpu.render_ctx()
    }

    pub fn viewport(&self) -> Viewport {
        let size = self.gpu.size();
        Viewport::new(size.width as f32, size.height as f32)
    }

    /// Acquires the next frame, lets `draw` record into it, then presents it.
    ///
    /// A lost or outdated surface skips the frame; an out-of-memory surface
    /// returns [`AppControl::Exit`].
    pub fn render<F>(&mut self, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, RenderTarget),
    {
        let frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::debug!("surface unavailable: {err}");
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    _ => AppControl::Continue,
                };
            }
        };

        draw(&self.gpu.render_ctx(), frame.target());

        self.window.window.pre_present_notify();
        self.gpu.present(frame);

        AppControl::Continue
    }
}
