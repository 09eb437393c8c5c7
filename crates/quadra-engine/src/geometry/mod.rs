//! Per-draw affine transforms and unit-quad projection.
//!
//! Everything here is pure and GPU-free.

mod transform;

pub use glam::{Mat4, Vec4};
pub use transform::{
    ortho, quad_corners, quad_transform, sprite_size, QUAD_TEX_COORDS, UNIT_QUAD,
};
