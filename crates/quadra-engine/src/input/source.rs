use super::{ButtonPhase, Key, MouseButton};

/// Read-only view of input for the current frame.
///
/// Pressed/released are edges relative to the previous frame and already
/// computed by the implementor; callers never track history themselves.
pub trait InputSource {
    fn key_phase(&self, key: Key) -> ButtonPhase;

    fn button_phase(&self, button: MouseButton) -> ButtonPhase;

    /// Pointer position in physical pixels, if over the window.
    fn pointer_position(&self) -> Option<(f32, f32)>;

    fn is_key_down(&self, key: Key) -> bool {
        self.key_phase(key).is_down()
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.key_phase(key).is_pressed()
    }

    fn is_key_released(&self, key: Key) -> bool {
        self.key_phase(key).is_released()
    }

    fn is_button_down(&self, button: MouseButton) -> bool {
        self.button_phase(button).is_down()
    }

    fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.button_phase(button).is_pressed()
    }

    fn is_button_released(&self, button: MouseButton) -> bool {
        self.button_phase(button).is_released()
    }
}
