//! Frame timing.
//!
//! One [`FrameClock`] drives the render loop; call `tick()` once per frame.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
