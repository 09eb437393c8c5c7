use winit::event::WindowEvent;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by the runtime.
pub trait App {
    /// Raw window events, after the runtime has fed them to input.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per frame. Input has already been advanced for this frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once before the window and GPU are torn down.
    fn on_exit(&mut self) {}
}
