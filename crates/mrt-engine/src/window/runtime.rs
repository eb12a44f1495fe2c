use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{AppControl, FrameCtx, FrameDriver, InitCtx, Lifecycle};
use crate::device::{Gpu, GpuInit};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Initial drawable size in physical pixels.
    pub initial_size: PhysicalSize<u32>,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "mrt-blit".to_string(),
            initial_size: PhysicalSize::new(400, 400),
            resizable: true,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, initializes `driver`, and runs frames until the window closes.
    ///
    /// Returns an error if the window, GPU context, or driver initialization
    /// failed; in that case no frame was rendered.
    pub fn run<D>(config: RuntimeConfig, gpu_init: GpuInit, driver: D) -> Result<()>
    where
        D: FrameDriver + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, driver);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => {
                log::info!("stopped after {} frames", state.lifecycle.frames());
                Ok(())
            }
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<D>
where
    D: FrameDriver + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    driver: D,

    lifecycle: Lifecycle,
    window: Option<WindowEntry>,
    failure: Option<anyhow::Error>,
}

impl<D> AppState<D>
where
    D: FrameDriver + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, driver: D) -> Self {
        Self {
            config,
            gpu_init,
            driver,
            lifecycle: Lifecycle::new(),
            window: None,
            failure: None,
        }
    }

    fn stop(&mut self, event_loop: &ActiveEventLoop) {
        self.lifecycle.stop();
        event_loop.exit();
    }

    /// Bootstrap + driver init, as one lifecycle step.
    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let Self {
            config,
            gpu_init,
            driver,
            lifecycle,
            window,
            ..
        } = self;

        lifecycle.initialize(|| {
            let entry = create_window_entry(event_loop, config, gpu_init.clone())?;
            entry.with_gpu(|gpu| driver.init(&InitCtx { gpu }))?;
            *window = Some(entry);
            Ok(())
        })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if !self.lifecycle.begin_frame() {
            return;
        }

        let (driver, window) = (&mut self.driver, &mut self.window);
        let Some(entry) = window.as_mut() else {
            return;
        };

        let control = entry.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: fields.window,
                gpu: fields.gpu,
            };
            driver.run_one_frame(&mut ctx)
        });

        if control == AppControl::Exit {
            self.stop(event_loop);
        }
    }
}

fn create_window_entry(
    event_loop: &ActiveEventLoop,
    config: &RuntimeConfig,
    gpu_init: GpuInit,
) -> Result<WindowEntry> {
    let attrs = Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(config.initial_size)
        .with_resizable(config.resizable);

    let window = event_loop
        .create_window(attrs)
        .context("failed to create window")?;

    WindowEntryTryBuilder {
        window,
        gpu_builder: |w| {
            pollster::block_on(Gpu::new(w, gpu_init)).context("failed to create GPU context")
        },
    }
    .try_build()
}

impl<D> ApplicationHandler for AppState<D>
where
    D: FrameDriver + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.lifecycle.is_stopped() {
            return;
        }

        if let Err(e) = self.initialize(event_loop) {
            log::error!("startup failed: {e:#}");
            self.failure = Some(e);
            self.stop(event_loop);
            return;
        }

        if let Some(entry) = &self.window {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.lifecycle.is_stopped() {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw: one frame per loop iteration.
        if let Some(entry) = &self.window {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.lifecycle.is_stopped() {
            event_loop.exit();
            return;
        }

        if self.driver.on_window_event(&event) == AppControl::Exit {
            self.stop(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                self.window = None;
                self.stop(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.window.as_mut() {
                    log::debug!("resized to {}x{}", new_size.width, new_size.height);
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.window.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}
