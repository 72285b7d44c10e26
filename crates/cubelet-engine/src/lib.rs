//! Cubelet engine crate.
//!
//! Owns the platform loop, the wgpu device and the fixed red-cube renderer
//! driven by the `cubelet-viewer` binary.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod render;
