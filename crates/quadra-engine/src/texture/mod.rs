//! Textures sampled by the batch renderer.

mod gpu;
mod image;
mod sampler;

pub use gpu::Texture;
pub use image::ImageData;
pub use sampler::SamplerConfig;

use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique texture identity.
///
/// Slot lookup compares ids, never GPU handles.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TextureId(u64);

impl TextureId {
    /// Allocates a fresh id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// What the batch renderer needs to know about a texture.
pub trait TextureHandle: Clone {
    fn id(&self) -> TextureId;
    fn width(&self) -> u32;
    fn height(&self) -> u32;
}
