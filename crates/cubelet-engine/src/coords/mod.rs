//! Screen-space helpers.

mod viewport;

pub use viewport::Viewport;
