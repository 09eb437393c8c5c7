use glam::Mat4;

use super::Vertex;
use crate::paint::Color;
use crate::texture::TextureHandle;

/// GPU operations the batch renderer is built on.
///
/// Calls arrive in submission order; a backend must not reorder draws.
pub trait DrawBackend {
    type Texture: TextureHandle;

    /// Reserves vertex storage and uploads the static index pattern. Called once.
    fn allocate(&mut self, vertex_capacity: usize, indices: &[u32]);

    fn clear(&mut self, color: Color);

    /// Binds `texture` to texture unit `unit` for the next draw.
    fn bind_texture(&mut self, unit: usize, texture: &Self::Texture);

    fn upload_vertices(&mut self, vertices: &[Vertex]);

    /// Draws the first `index_count` indices over the uploaded vertices.
    fn draw_indexed(&mut self, index_count: u32, view_projection: &Mat4);

    /// Frees the storage from [`DrawBackend::allocate`].
    fn release(&mut self) {}
}
