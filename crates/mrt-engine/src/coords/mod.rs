//! Pixel-space geometry shared by the render passes.
//!
//! Canonical space:
//! - Physical pixels
//! - Origin top-left
//! - +X right, +Y down (wgpu viewport convention)

mod pixel_rect;

pub use pixel_rect::{PixelRect, PixelSize};
