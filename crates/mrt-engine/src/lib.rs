//! MRT engine crate.
//!
//! Owns the platform + GPU runtime pieces and the render passes of the
//! multiple-render-target demo: four color attachments written by one draw,
//! then blitted into the four quadrants of the window.

pub mod core;
pub mod device;
pub mod window;

pub mod coords;
pub mod logging;
pub mod paint;
pub mod render;
