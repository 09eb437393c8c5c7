//! Shader loading.
//!
//! A shader file holds two WGSL sections separated by marker lines:
//!
//! ```text
//! #VERTEX_SHADER
//! <vertex stage, entry point `vs_main`>
//! #FRAGMENT_SHADER
//! <fragment stage, entry point `fs_main`>
//! ```
//!
//! Loading goes parse -> compile each stage -> link -> (debug) validate -> pipeline.
//! Only a malformed file is an `Err`; compile/link failures produce an invalid
//! [`ShaderProgram`] that carries its diagnostics.

mod compile;
mod error;
mod program;
mod source;

pub use compile::{compile_and_link, compile_stage, link, validate, CompiledStage, LinkedStages, ProgramBuild};
pub use error::{ShaderError, ShaderStage};
pub use program::{load_shader, load_shader_file, ShaderProgram, UNIFORM_MODEL, UNIFORM_VIEW_PROJECTION};
pub use source::{ShaderSource, FRAGMENT_MARKER, VERTEX_MARKER};

/// Built-in batch shader: 32 texture slots, `u_view_projection` and `u_model`.
pub const BATCH_SHADER: &str = include_str!("batch.wgsl");
