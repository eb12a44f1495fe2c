//! Renders four colors into four offscreen targets with one draw, then blits
//! each target into one quadrant of the window.

use anyhow::{Context, Result};

use mrt_engine::core::{AppControl, FrameCtx, FrameDriver, InitCtx};
use mrt_engine::device::GpuInit;
use mrt_engine::logging::{init_logging, LoggingConfig};
use mrt_engine::paint::Color;
use mrt_engine::render::{MrtScene, TargetDesc};
use mrt_engine::window::{Runtime, RuntimeConfig};

/// Exit status for any startup failure (window, context, program, or target).
const STARTUP_FAILURE: i32 = -1;

#[derive(Default)]
struct MrtDemo {
    scene: Option<MrtScene>,
}

impl FrameDriver for MrtDemo {
    fn init(&mut self, ctx: &InitCtx<'_, '_>) -> Result<()> {
        let gpu = ctx.gpu;
        let scene = MrtScene::new(gpu.device(), gpu.surface_format(), TargetDesc::default())
            .context("failed to set up MRT scene")?;
        self.scene = Some(scene);
        Ok(())
    }

    fn run_one_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(scene) = self.scene.as_ref() else {
            return AppControl::Exit;
        };

        ctx.render(Color::WHITE.with_alpha(0.0), |target| scene.draw(target))
    }
}

fn main() {
    init_logging(LoggingConfig::default());

    let gpu_init = GpuInit {
        // Keep 0.5 gray at 0.5 on screen, as an 8-bit RGBA framebuffer would.
        prefer_srgb: false,
        ..GpuInit::default()
    };

    if let Err(e) = Runtime::run(RuntimeConfig::default(), gpu_init, MrtDemo::default()) {
        log::error!("{e:#}");
        std::process::exit(STARTUP_FAILURE);
    }
}
