//! 2D camera producing the view-projection matrix handed to the batch renderer.

use glam::{Mat4, Vec3};

use crate::coords::{Vec2, Viewport};
use crate::geometry::ortho;

const MIN_ZOOM: f32 = 0.01;

/// Orthographic 2D camera.
///
/// The view transform is `inverse(translate(position)) * rotate_z(rotation) * scale(zoom)`,
/// so moving the camera right moves the world left on screen, and `zoom > 1`
/// magnifies around the world origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera2d {
    pub position: Vec2,
    /// Rotation around +Z, in degrees.
    pub rotation: f32,
    zoom: f32,
    projection: Mat4,
}

impl Default for Camera2d {
    fn default() -> Self {
        Self {
            position: Vec2::zero(),
            rotation: 0.0,
            zoom: 1.0,
            projection: Mat4::IDENTITY,
        }
    }
}

impl Camera2d {
    /// Camera whose projection covers `viewport` in pixel units.
    pub fn for_viewport(viewport: Viewport) -> Self {
        Self {
            projection: viewport.projection(),
            ..Self::default()
        }
    }

    pub fn set_projection(&mut self, left: f32, right: f32, bottom: f32, top: f32) {
        self.projection = ortho(left, right, bottom, top);
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Sets the zoom factor. Values at or below zero are clamped to a small
    /// positive minimum so the view matrix stays invertible.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = if zoom.is_finite() { zoom.max(MIN_ZOOM) } else { 1.0 };
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position = self.position + delta;
    }

    pub fn view(&self) -> Mat4 {
        let inverse_view = Mat4::from_translation(self.position.extend(0.0)).inverse();
        inverse_view
            * Mat4::from_rotation_z(self.rotation.to_radians())
            * Mat4::from_scale(Vec3::new(self.zoom, self.zoom, 1.0))
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn close(a: Vec4, b: Vec4) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn default_view_is_identity() {
        let cam = Camera2d::for_viewport(Viewport::new(800.0, 600.0));
        assert_eq!(cam.view(), Mat4::IDENTITY);
        assert_eq!(cam.view_projection(), cam.projection());
    }

    #[test]
    fn moving_camera_shifts_world_opposite() {
        let mut cam = Camera2d::default();
        cam.translate(Vec2::new(10.0, 5.0));
        let p = cam.view() * Vec4::new(10.0, 5.0, 0.0, 1.0);
        assert!(close(p, Vec4::new(0.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn zoom_scales_world() {
        let mut cam = Camera2d::default();
        cam.set_zoom(2.0);
        let p = cam.view() * Vec4::new(3.0, 4.0, 0.0, 1.0);
        assert!(close(p, Vec4::new(6.0, 8.0, 0.0, 1.0)));
    }

    #[test]
    fn zoom_never_reaches_zero() {
        let mut cam = Camera2d::default();
        cam.set_zoom(-1.0);
        assert!(cam.zoom() > 0.0);
        assert!(cam.view().is_finite());
    }

    #[test]
    fn quarter_turn_rotates_x_onto_y() {
        let mut cam = Camera2d::default();
        cam.rotation = 90.0;
        let p = cam.view() * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!(close(p, Vec4::new(0.0, 1.0, 0.0, 1.0)));
    }
}
