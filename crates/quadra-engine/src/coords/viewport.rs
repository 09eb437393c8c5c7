use crate::geometry::{ortho, Mat4};

/// Drawable area in logical pixels.
///
/// The camera derives its default projection from this: `(0, 0)` bottom-left,
/// `(width, height)` top-right.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Pixel-space orthographic projection covering the viewport.
    ///
    /// Degenerate viewports (minimized windows) are clamped to 1x1 so the
    /// matrix stays invertible.
    pub fn projection(self) -> Mat4 {
        ortho(0.0, self.width.max(1.0), 0.0, self.height.max(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_maps_corners_to_ndc() {
        let p = Viewport::new(200.0, 100.0).projection();
        let bl = p * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let tr = p * glam::Vec4::new(200.0, 100.0, 0.0, 1.0);
        assert!((bl.x + 1.0).abs() < 1e-6 && (bl.y + 1.0).abs() < 1e-6);
        assert!((tr.x - 1.0).abs() < 1e-6 && (tr.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_sized_viewport_is_invalid_but_projects() {
        let v = Viewport::new(0.0, 0.0);
        assert!(!v.is_valid());
        assert!(v.projection().is_finite());
    }
}
