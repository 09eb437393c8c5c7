use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::InputState;
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "quadra".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            resizable: true,
        }
    }
}

/// Requests an application can make from inside a callback.
///
/// Applied after the current callback returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    exit: bool,
}

impl RuntimeCtx {
    pub fn exit(&mut self) {
        self.exit = true;
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window and runs `app` until it exits or the window closes.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState {
            config,
            gpu_init,
            app,
            window: None,
            exit_requested: false,
            init_error: None,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.init_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input: InputState,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    exit_requested: bool,
    init_error: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(self.config.resizable);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            input: InputState::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        self.window = Some(entry);
        Ok(())
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if !self.exit_requested {
            self.exit_requested = true;
            self.app.on_exit();
        }
        self.window = None;
        event_loop.exit();
    }

    fn redraw(&mut self) -> bool {
        let Some(entry) = self.window.as_mut() else { return false };
        let app = &mut self.app;
        let mut runtime = RuntimeCtx::default();
        let mut control = AppControl::Continue;

        entry.with_mut(|fields| {
            fields.input.update();
            let time = fields.clock.tick();

            let mut ctx = FrameCtx {
                window: WindowCtx {
                    window: fields.window,
                },
                gpu: fields.gpu,
                input: &*fields.input,
                time,
                runtime: &mut runtime,
            };
            control = app.on_frame(&mut ctx);
        });

        control == AppControl::Exit || runtime.exit
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window(event_loop) {
            log::error!("failed to create window: {e:#}");
            self.init_error = Some(e);
            self.shutdown(event_loop);
            return;
        }

        if let Some(entry) = &self.window {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Continuous redraw: the batch renderer redraws every frame.
        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(entry) = &self.window {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if self.exit_requested {
            return;
        }

        if let Some(entry) = self.window.as_mut() {
            if let Some(ev) = translate_window_event(&event) {
                entry.with_input_mut(|input| input.apply_event(&ev));
            }
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.shutdown(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.window.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.window.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                }
            }

            WindowEvent::RedrawRequested => {
                if self.redraw() {
                    self.shutdown(event_loop);
                }
            }

            _ => {}
        }
    }
}
