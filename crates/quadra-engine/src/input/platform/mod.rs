//! Platform event translation.

pub mod winit;
