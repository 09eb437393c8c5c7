//! quadra engine crate.
//!
//! A 2D batch renderer on wgpu: quads and sprites are accumulated by
//! [`batch::BatchRenderer`] and submitted in as few draws as possible, using
//! shader programs loaded from dual-section WGSL files ([`shader`]).
//!
//! The platform pieces (window runtime, GPU device, input, timing) are small
//! and exist so the renderer runs end to end.

pub mod batch;
pub mod camera;
pub mod core;
pub mod coords;
pub mod device;
pub mod error;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod shader;
pub mod texture;
pub mod time;
pub mod window;
