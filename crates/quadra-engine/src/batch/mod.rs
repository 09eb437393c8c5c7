//! Quad batching.
//!
//! [`BatchRenderer`] accumulates coloured and textured quads in a bounded CPU
//! vertex array and hands them to a [`DrawBackend`] in as few draws as possible.

mod backend;
mod index;
mod renderer;
mod slots;
mod vertex;

pub use backend::DrawBackend;
pub use index::{quad_indices, INDICES_PER_QUAD, MAX_QUADS_PER_BATCH, VERTICES_PER_QUAD};
pub use renderer::{BatchRenderer, BatchStats};
pub use slots::{TextureSlotOverflow, TextureSlots, MAX_TEXTURE_SLOTS};
pub use vertex::{Vertex, UNTEXTURED_SLOT, VERTEX_ATTRIBUTE_COUNT};
