//! GPU rendering subsystem.
//!
//! The MRT pipeline in frame order:
//! - `program`: compiles and links the vertex + fragment pair
//! - `target`: four same-sized color attachments, checked for completeness
//! - `geometry`: one indexed quad drawn into all attachments at once
//! - `blit`: each attachment scaled into one quadrant of the destination
//!
//! `scene` bundles them for a window.

mod blit;
mod ctx;
mod geometry;
mod program;
mod scene;
mod target;

pub use blit::{quadrant_layout, BlitCompositor, Quadrant, QuadrantPosition, QUADRANT_ORDER};
pub use ctx::RenderTarget;
pub use geometry::{QuadGeometry, QuadVertex, QUAD_INDICES, QUAD_VERTICES};
pub use program::{
    compile, link, LinkedStages, ProgramDesc, ProgramError, ShaderProgram, ShaderStage,
};
pub use scene::{MrtScene, ATTACHMENT_COLORS, MRT_FRAGMENT_WGSL, MRT_VERTEX_WGSL};
pub use target::{check_completeness, AttachmentInfo, OffscreenTarget, TargetDesc, TargetError};
