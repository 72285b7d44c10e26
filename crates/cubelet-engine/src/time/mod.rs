//! Time subsystem.
//!
//! Frame timing for diagnostics only; nothing in the scene depends on it.
//! - one `FrameClock` per window
//! - call `tick()` once per presented frame to obtain `FrameTime`

mod frame_clock;

pub use frame_clock::{FrameClock, FrameRate, FrameTime};
