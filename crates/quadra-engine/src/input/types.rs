use std::fmt;

/// Keyboard key identifier.
///
/// The runtime maps physical key codes into these variants where possible.
/// Unsupported keys become `Key::Unknown(u32)` with the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Meta,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Function keys
    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    /// Platform-dependent key not yet represented here.
    Unknown(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// Raw state carried by a key or button event.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Modifier keys state.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),

    Key {
        key: Key,
        state: ButtonState,
        /// True when the platform generated the event by key repeat.
        repeat: bool,
    },

    /// Pointer position in physical pixels, top-left origin.
    PointerMoved { x: f32, y: f32 },

    PointerButton {
        button: MouseButton,
        state: ButtonState,
    },

    /// Pointer left the window surface.
    PointerLeft,

    /// Window focus change.
    Focused(bool),
}
