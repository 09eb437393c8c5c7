use glam::{Mat4, Vec4};

use crate::coords::Vec2;

/// Corners of the unit quad, counter-clockwise from the origin.
///
/// The winding order is shared with [`QUAD_TEX_COORDS`] and the index pattern
/// generated by the batch renderer (`0,1,2` and `2,3,0`).
pub const UNIT_QUAD: [Vec4; 4] = [
    Vec4::new(0.0, 0.0, 0.0, 1.0),
    Vec4::new(1.0, 0.0, 0.0, 1.0),
    Vec4::new(1.0, 1.0, 0.0, 1.0),
    Vec4::new(0.0, 1.0, 0.0, 1.0),
];

/// Texture coordinates for each corner of [`UNIT_QUAD`].
pub const QUAD_TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// `translate(position) * scale(size)`.
#[inline]
pub fn quad_transform(position: Vec2, size: Vec2) -> Mat4 {
    Mat4::from_translation(position.extend(0.0)) * Mat4::from_scale(size.extend(1.0))
}

/// Projects the unit quad corners into world space for a quad at `position`
/// with extent `size`.
#[inline]
pub fn quad_corners(position: Vec2, size: Vec2) -> [Vec4; 4] {
    let transform = quad_transform(position, size);
    UNIT_QUAD.map(|corner| transform * corner)
}

/// World-space extent of a sprite: texture pixels times per-axis scale.
#[inline]
pub fn sprite_size(width: u32, height: u32, scale: Vec2) -> Vec2 {
    Vec2::new(width as f32, height as f32).scaled_by(scale)
}

/// Orthographic projection with a `[-1, 1]` depth range.
#[inline]
pub fn ortho(left: f32, right: f32, bottom: f32, top: f32) -> Mat4 {
    Mat4::orthographic_rh_gl(left, right, bottom, top, -1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy(v: Vec4) -> (f32, f32) {
        (v.x, v.y)
    }

    #[test]
    fn corners_follow_unit_quad_winding() {
        let c = quad_corners(Vec2::new(10.0, 20.0), Vec2::new(5.0, 5.0));
        assert_eq!(xy(c[0]), (10.0, 20.0));
        assert_eq!(xy(c[1]), (15.0, 20.0));
        assert_eq!(xy(c[2]), (15.0, 25.0));
        assert_eq!(xy(c[3]), (10.0, 25.0));
    }

    #[test]
    fn corners_stay_homogeneous() {
        for c in quad_corners(Vec2::new(-3.0, 7.5), Vec2::new(2.0, 0.5)) {
            assert_eq!(c.z, 0.0);
            assert_eq!(c.w, 1.0);
        }
    }

    #[test]
    fn scale_applies_before_translation() {
        // Scaling must not move the origin corner.
        let c = quad_corners(Vec2::new(100.0, 100.0), Vec2::new(3.0, 3.0));
        assert_eq!(xy(c[0]), (100.0, 100.0));
        assert_eq!(xy(c[2]), (103.0, 103.0));
    }

    #[test]
    fn zero_size_collapses_to_position() {
        for c in quad_corners(Vec2::new(4.0, 2.0), Vec2::zero()) {
            assert_eq!(xy(c), (4.0, 2.0));
        }
    }

    #[test]
    fn sprite_size_scales_texture_pixels() {
        assert_eq!(sprite_size(16, 8, Vec2::new(3.0, 2.0)), Vec2::new(48.0, 16.0));
    }

    #[test]
    fn ortho_maps_bounds_to_clip_edges() {
        let p = ortho(0.0, 1280.0, 0.0, 720.0);
        let v = p * Vec4::new(1280.0, 720.0, 0.0, 1.0);
        assert!((v.x - 1.0).abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }
}
