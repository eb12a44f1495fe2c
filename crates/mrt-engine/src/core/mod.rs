//! Core engine-facing contracts.
//!
//! This module defines the stable interface between the runtime (platform loop)
//! and applications: the frame driver trait, its lifecycle, and the per-frame
//! context.

mod app;
mod ctx;
mod lifecycle;

pub use app::{AppControl, FrameDriver, InitCtx};
pub use ctx::FrameCtx;
pub use lifecycle::{Lifecycle, Stage};
