//! Color model shared by renderers and applications.

mod color;

pub use color::Color;
