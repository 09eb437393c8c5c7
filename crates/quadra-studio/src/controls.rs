use quadra_engine::camera::Camera2d;
use quadra_engine::coords::Vec2;
use quadra_engine::input::{InputSource, Key};

/// Keyboard camera controls, in units per second.
#[derive(Debug, Copy, Clone)]
pub struct CameraControls {
    pub pan_speed: f32,
    pub zoom_speed: f32,
    /// Degrees per second.
    pub rotate_speed: f32,
}

impl Default for CameraControls {
    fn default() -> Self {
        Self {
            pan_speed: 240.0,
            zoom_speed: 0.5,
            rotate_speed: 45.0,
        }
    }
}

impl CameraControls {
    /// Applies held keys to `camera` for a frame of `dt` seconds.
    ///
    /// D/A move right/left, S/W move up/down, Z/X zoom in/out, R/E rotate.
    pub fn apply(&self, camera: &mut Camera2d, input: &dyn InputSource, dt: f32) {
        let axis = |pos: Key, neg: Key| -> f32 {
            (input.is_key_down(pos) as i32 - input.is_key_down(neg) as i32) as f32
        };

        let pan = Vec2::new(axis(Key::D, Key::A), axis(Key::S, Key::W));
        camera.translate(pan * (self.pan_speed * dt));

        let zoom = axis(Key::Z, Key::X);
        if zoom != 0.0 {
            camera.set_zoom(camera.zoom() + zoom * self.zoom_speed * dt);
        }

        camera.rotation += axis(Key::R, Key::E) * self.rotate_speed * dt;
    }
}
