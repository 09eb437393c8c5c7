//! Coordinate types shared by the renderer, camera and input layers.
//!
//! Canonical CPU space is world units. With the default orthographic camera
//! one world unit maps to one physical pixel, origin bottom-left, +Y up.
//! The view-projection matrix bound at flush time maps world space to clip space.

mod vec2;
mod viewport;

pub use vec2::Vec2;
pub use viewport::Viewport;
