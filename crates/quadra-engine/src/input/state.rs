use super::phase::{ButtonPhase, ButtonTracker};
use super::source::InputSource;
use super::types::{ButtonState, InputEvent, Key, Modifiers, MouseButton};

/// Input state for the window.
///
/// Events are applied as they arrive; [`InputState::update`] is called by the
/// runtime once per frame, before the application sees it.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in physical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    keys: ButtonTracker<Key>,
    buttons: ButtonTracker<MouseButton>,
}

impl InputState {
    /// Applies a platform-agnostic input event.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match *ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = m,

            InputEvent::Focused(f) => {
                self.focused = f;
                if !f {
                    // Avoid stuck keys when focus changes mid-press.
                    self.keys.release_all();
                    self.buttons.release_all();
                }
            }

            InputEvent::PointerMoved { x, y } => self.pointer_pos = Some((x, y)),

            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, state, repeat } => match state {
                ButtonState::Pressed if !repeat => self.keys.press(key),
                ButtonState::Pressed => {}
                ButtonState::Released => self.keys.release(key),
            },

            InputEvent::PointerButton { button, state } => match state {
                ButtonState::Pressed => self.buttons.press(button),
                ButtonState::Released => self.buttons.release(button),
            },
        }
    }

    /// Computes this frame's phases from the events since the last update.
    pub fn update(&mut self) {
        self.keys.update();
        self.buttons.update();
    }
}

impl InputSource for InputState {
    fn key_phase(&self, key: Key) -> ButtonPhase {
        self.keys.phase(key)
    }

    fn button_phase(&self, button: MouseButton) -> ButtonPhase {
        self.buttons.phase(button)
    }

    fn pointer_position(&self) -> Option<(f32, f32)> {
        self.pointer_pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: ButtonState) -> InputEvent {
        InputEvent::Key {
            key,
            state,
            repeat: false,
        }
    }

    #[test]
    fn key_lifecycle_through_frames() {
        let mut s = InputState::default();
        s.apply_event(&key(Key::W, ButtonState::Pressed));
        s.update();
        assert!(s.is_key_pressed(Key::W));
        assert!(s.is_key_down(Key::W));

        s.update();
        assert!(!s.is_key_pressed(Key::W));
        assert!(s.is_key_down(Key::W));

        s.apply_event(&key(Key::W, ButtonState::Released));
        s.update();
        assert!(s.is_key_released(Key::W));
        assert!(!s.is_key_down(Key::W));
    }

    #[test]
    fn os_repeat_stays_held() {
        let mut s = InputState::default();
        s.apply_event(&key(Key::A, ButtonState::Pressed));
        s.update();
        s.apply_event(&InputEvent::Key {
            key: Key::A,
            state: ButtonState::Pressed,
            repeat: true,
        });
        s.update();
        assert_eq!(s.key_phase(Key::A), ButtonPhase::Held);
    }

    #[test]
    fn phases_do_not_change_between_updates() {
        let mut s = InputState::default();
        s.update();
        s.apply_event(&key(Key::Space, ButtonState::Pressed));
        // Not visible until the next frame begins.
        assert_eq!(s.key_phase(Key::Space), ButtonPhase::Up);
        s.update();
        assert!(s.is_key_pressed(Key::Space));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut s = InputState::default();
        s.apply_event(&key(Key::D, ButtonState::Pressed));
        s.apply_event(&InputEvent::PointerButton {
            button: MouseButton::Left,
            state: ButtonState::Pressed,
        });
        s.update();
        s.apply_event(&InputEvent::Focused(false));
        s.update();
        assert!(s.is_key_released(Key::D));
        assert!(s.is_button_released(MouseButton::Left));
    }

    #[test]
    fn pointer_tracking() {
        let mut s = InputState::default();
        s.apply_event(&InputEvent::PointerMoved { x: 3.0, y: 4.0 });
        assert_eq!(s.pointer_position(), Some((3.0, 4.0)));
        s.apply_event(&InputEvent::PointerLeft);
        assert_eq!(s.pointer_position(), None);
    }
}
