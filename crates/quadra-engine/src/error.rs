//! Errors surfaced by the rendering core.
//!
//! Shader loading has its own error type in [`crate::shader::ShaderError`].

/// Failures that prevent a renderer or texture from being created.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    /// Batch capacity was zero, too large to index with `u32`, or too large
    /// for one device buffer.
    #[error("batch capacity of {requested} quads is out of range (1..={max})")]
    CapacityMisconfigured { requested: usize, max: usize },

    /// Decoded pixel data cannot be uploaded as an RGBA8 texture.
    #[error("invalid image data: {0}")]
    InvalidImageData(String),
}
