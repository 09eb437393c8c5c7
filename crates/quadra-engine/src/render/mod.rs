//! GPU rendering subsystem.
//!
//! [`WgpuBackend`] drives the batch renderer with wgpu: one render pass and one
//! queue submission per flush, drawing into the frame's [`RenderTarget`].
//!
//! Convention:
//! - World space is whatever the active view-projection maps to clip space.
//! - `Camera2d::for_viewport` gives pixel units with a bottom-left origin, +Y up.

mod ctx;
mod wgpu_backend;

pub use ctx::{RenderCtx, RenderTarget};
pub use wgpu_backend::WgpuBackend;
