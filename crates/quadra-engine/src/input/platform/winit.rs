//! winit -> [`InputEvent`] translation.

use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

use crate::input::{ButtonState, InputEvent, Key, Modifiers, MouseButton};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// Returns `None` for events not represented by the input subsystem.
pub fn translate_window_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::ModifiersChanged(m) => Some(InputEvent::ModifiersChanged(map_modifiers(m.state()))),

        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeft),

        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::PointerMoved {
            x: position.x as f32,
            y: position.y as f32,
        }),

        WindowEvent::MouseInput { state, button, .. } => Some(InputEvent::PointerButton {
            button: map_mouse_button(*button),
            state: map_state(*state),
        }),

        WindowEvent::KeyboardInput { event, .. } => Some(InputEvent::Key {
            key: map_physical_key(event.physical_key),
            state: map_state(event.state),
            repeat: event.repeat,
        }),

        _ => None,
    }
}

fn map_state(state: ElementState) -> ButtonState {
    match state {
        ElementState::Pressed => ButtonState::Pressed,
        ElementState::Released => ButtonState::Released,
    }
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

fn map_physical_key(pk: PhysicalKey) -> Key {
    match pk {
        PhysicalKey::Code(code) => map_key_code(code),
        // NativeKeyCode carries no stable numeric code.
        PhysicalKey::Unidentified(_) => Key::Unknown(0),
    }
}

/// Maps a layout-independent key code.
pub fn map_key_code(code: KeyCode) -> Key {
    const LETTERS: [Key; 26] = [
        Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
        Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
        Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
    ];
    const LETTER_CODES: [KeyCode; 26] = [
        KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE,
        KeyCode::KeyF, KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ,
        KeyCode::KeyK, KeyCode::KeyL, KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO,
        KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR, KeyCode::KeyS, KeyCode::KeyT,
        KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX, KeyCode::KeyY,
        KeyCode::KeyZ,
    ];
    const DIGITS: [(KeyCode, Key); 10] = [
        (KeyCode::Digit0, Key::Digit0),
        (KeyCode::Digit1, Key::Digit1),
        (KeyCode::Digit2, Key::Digit2),
        (KeyCode::Digit3, Key::Digit3),
        (KeyCode::Digit4, Key::Digit4),
        (KeyCode::Digit5, Key::Digit5),
        (KeyCode::Digit6, Key::Digit6),
        (KeyCode::Digit7, Key::Digit7),
        (KeyCode::Digit8, Key::Digit8),
        (KeyCode::Digit9, Key::Digit9),
    ];
    const FUNCTION: [(KeyCode, Key); 12] = [
        (KeyCode::F1, Key::F1),
        (KeyCode::F2, Key::F2),
        (KeyCode::F3, Key::F3),
        (KeyCode::F4, Key::F4),
        (KeyCode::F5, Key::F5),
        (KeyCode::F6, Key::F6),
        (KeyCode::F7, Key::F7),
        (KeyCode::F8, Key::F8),
        (KeyCode::F9, Key::F9),
        (KeyCode::F10, Key::F10),
        (KeyCode::F11, Key::F11),
        (KeyCode::F12, Key::F12),
    ];

    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Space => Key::Space,

        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,

        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
        KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
        KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,

        other => LETTER_CODES
            .iter()
            .position(|&c| c == other)
            .map(|i| LETTERS[i])
            .or_else(|| DIGITS.iter().find(|(c, _)| *c == other).map(|(_, k)| *k))
            .or_else(|| FUNCTION.iter().find(|(c, _)| *c == other).map(|(_, k)| *k))
            .unwrap_or(Key::Unknown(other as u32)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_camera_keys() {
        assert_eq!(map_key_code(KeyCode::KeyW), Key::W);
        assert_eq!(map_key_code(KeyCode::KeyZ), Key::Z);
        assert_eq!(map_key_code(KeyCode::Digit7), Key::Digit7);
        assert_eq!(map_key_code(KeyCode::F12), Key::F12);
        assert_eq!(map_key_code(KeyCode::ShiftRight), Key::Shift);
    }

    #[test]
    fn unmapped_keys_keep_their_code() {
        assert_eq!(
            map_key_code(KeyCode::NumLock),
            Key::Unknown(KeyCode::NumLock as u32)
        );
    }

    #[test]
    fn ignores_non_input_events() {
        assert_eq!(translate_window_event(&WindowEvent::CloseRequested), None);
        assert_eq!(
            translate_window_event(&WindowEvent::Focused(false)),
            Some(InputEvent::Focused(false))
        );
    }
}
