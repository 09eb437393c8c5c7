use std::fmt;

/// Programmable pipeline stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Entry point name the renderer binds for this stage.
    pub const fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }

    pub(crate) fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Shader loading failure.
///
/// Only [`ShaderError::MalformedShaderSource`] and [`ShaderError::Io`] abort a load.
/// The rest are collected on the resulting program as diagnostics.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShaderError {
    #[error("malformed shader source: {0}")]
    MalformedShaderSource(String),

    #[error("failed to compile {stage} shader:\n{log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("failed to link shader program:\n{0}")]
    Link(String),

    #[error("shader program failed validation:\n{0}")]
    Validate(String),

    #[error("failed to read shader file {path}: {message}")]
    Io { path: String, message: String },
}
