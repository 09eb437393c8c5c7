//! Colour model shared between callers and the batch renderer.

pub mod color;

pub use color::Color;
