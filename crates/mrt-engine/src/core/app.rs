use anyhow::Result;
use winit::event::WindowEvent;

use crate::device::Gpu;

use super::ctx::FrameCtx;

/// Control directive returned by driver callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Context for the one-time initialization step.
pub struct InitCtx<'a, 'w> {
    pub gpu: &'a Gpu<'w>,
}

/// Frame driver contract implemented by applications.
///
/// The runtime calls `init` once after the window and GPU exist, then
/// `run_one_frame` once per redraw until the loop stops. Whether the loop is
/// a native event loop or a host scheduler is the runtime's business.
pub trait FrameDriver {
    /// Builds GPU resources. An error aborts startup before any frame runs.
    fn init(&mut self, ctx: &InitCtx<'_, '_>) -> Result<()>;

    /// Renders and presents one frame.
    fn run_one_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called for window events before the runtime handles them.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }
}
