//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the window, wires them to the GPU layer,
//! and drives a [`FrameDriver`](crate::core::FrameDriver) through its lifecycle.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
