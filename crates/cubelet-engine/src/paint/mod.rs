//! Color representation shared by the clear pass and vertex data.

pub mod color;

pub use color::Color;
