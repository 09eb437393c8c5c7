use glam::{Mat4, Vec4};

use super::index::{quad_indices, INDICES_PER_QUAD, MAX_QUADS_PER_BATCH, VERTICES_PER_QUAD};
use super::{DrawBackend, TextureSlots, Vertex, UNTEXTURED_SLOT};
use crate::coords::Vec2;
use crate::error::RenderError;
use crate::geometry::{quad_corners, sprite_size, QUAD_TEX_COORDS};
use crate::paint::Color;
use crate::texture::TextureHandle;

/// Per-frame submission counters.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct BatchStats {
    /// Flushes issued, empty ones included.
    pub flushes: u32,
    /// Flushes that drew at least one quad.
    pub draw_calls: u32,
    pub quads: usize,
}

/// Accumulates quads and submits them in bounded batches.
///
/// Quads are drawn in call order. A batch is submitted when it reaches
/// `max_quads`, when a 33rd distinct texture is needed, or on [`flush`].
///
/// [`flush`]: BatchRenderer::flush
pub struct BatchRenderer<B: DrawBackend> {
    backend: B,
    max_quads: usize,

    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    quad_count: usize,
    slots: TextureSlots<B::Texture>,

    view_projection: Mat4,
    stats: BatchStats,
}

impl<B: DrawBackend> BatchRenderer<B> {
    pub fn new(mut backend: B, max_quads: usize) -> Result<Self, RenderError> {
        if max_quads == 0 || max_quads > MAX_QUADS_PER_BATCH {
            return Err(RenderError::CapacityMisconfigured {
                requested: max_quads,
                max: MAX_QUADS_PER_BATCH,
            });
        }

        let vertex_capacity = max_quads * VERTICES_PER_QUAD;
        let indices = quad_indices(max_quads);
        backend.allocate(vertex_capacity, &indices);

        log::debug!("batch renderer created: {max_quads} quads per batch");

        Ok(Self {
            backend,
            max_quads,
            vertices: vec![Vertex::default(); vertex_capacity],
            indices,
            quad_count: 0,
            slots: TextureSlots::new(),
            view_projection: Mat4::IDENTITY,
            stats: BatchStats::default(),
        })
    }

    /// Releases the backend's GPU storage.
    pub fn destroy(mut self) {
        if self.quad_count > 0 {
            log::warn!("batch renderer destroyed with {} unflushed quads", self.quad_count);
        }
        self.backend.release();
        log::debug!("batch renderer destroyed");
    }

    /// Takes effect at the next flush.
    #[inline]
    pub fn set_view_projection(&mut self, matrix: Mat4) {
        self.view_projection = matrix;
    }

    /// Clears the target. Pending quads are kept.
    pub fn clear(&mut self, color: Color) {
        self.backend.clear(color);
    }

    /// Queues an untextured quad with its origin corner at `position`.
    pub fn add_quad(&mut self, position: Vec2, size: Vec2, color: Color) {
        self.push_quad(quad_corners(position, size), color, UNTEXTURED_SLOT);
    }

    /// Queues a sprite of `texture`, sized by its pixel extent times `scale`.
    pub fn add_texture(&mut self, texture: &B::Texture, position: Vec2, scale: Vec2) {
        let slot = match self.slots.try_insert(texture) {
            Ok(slot) => slot,
            Err(overflow) => {
                log::debug!("{overflow}; flushing {} quads early", self.quad_count);
                self.flush();
                // Slots are empty after a flush.
                self.slots.try_insert(texture).unwrap_or(0)
            }
        };

        let size = sprite_size(texture.width(), texture.height(), scale);
        self.push_quad(quad_corners(position, size), Color::WHITE, slot as i32);
    }

    /// Submits pending quads in one indexed draw and starts a new batch.
    ///
    /// With nothing pending this still issues a zero-index draw.
    pub fn flush(&mut self) {
        for (unit, texture) in self.slots.iter() {
            self.backend.bind_texture(unit, texture);
        }

        let vertex_count = self.quad_count * VERTICES_PER_QUAD;
        self.backend.upload_vertices(&self.vertices[..vertex_count]);

        // Capacity was bounded at construction so this cannot truncate.
        let index_count = (self.quad_count * INDICES_PER_QUAD) as u32;
        self.backend.draw_indexed(index_count, &self.view_projection);

        log::trace!(
            "flushed {} quads, {} textures",
            self.quad_count,
            self.slots.len()
        );

        self.stats.flushes += 1;
        if self.quad_count > 0 {
            self.stats.draw_calls += 1;
        }
        self.stats.quads += self.quad_count;

        self.quad_count = 0;
        self.slots.clear();
    }

    fn push_quad(&mut self, corners: [Vec4; 4], color: Color, slot: i32) {
        let base = self.quad_count * VERTICES_PER_QUAD;
        let quad = &mut self.vertices[base..base + VERTICES_PER_QUAD];

        for ((vertex, corner), uv) in quad.iter_mut().zip(corners).zip(QUAD_TEX_COORDS) {
            vertex.position = corner.to_array();
            vertex.color = color.to_array();
            vertex.tex_coords = uv;
            vertex.slot = slot;
        }

        self.quad_count += 1;
        if self.quad_count == self.max_quads {
            self.flush();
        }
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.quad_count
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn max_quads(&self) -> usize {
        self.max_quads
    }

    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.view_projection
    }

    /// Vertices of the pending quads.
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices[..self.quad_count * VERTICES_PER_QUAD]
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn stats(&self) -> BatchStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = BatchStats::default();
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
