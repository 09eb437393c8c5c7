//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The runtime translates platform events (see [`platform`]) into
//! [`InputEvent`]s, feeds them to an [`InputState`] and advances it once per
//! frame. Applications query it through [`InputSource`].

mod phase;
pub mod platform;
mod source;
mod state;
mod types;

pub use phase::{ButtonPhase, ButtonTracker};
pub use source::InputSource;
pub use state::InputState;
pub use types::{ButtonState, InputEvent, Key, Modifiers, MouseButton};
