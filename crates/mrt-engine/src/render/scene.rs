use anyhow::{Context, Result};

use crate::coords::PixelSize;
use crate::paint::Color;

use super::{
    BlitCompositor, OffscreenTarget, ProgramDesc, QuadGeometry, QuadVertex, RenderTarget,
    ShaderProgram, TargetDesc,
};

pub const MRT_VERTEX_WGSL: &str = include_str!("shaders/mrt_vertex.wgsl");
pub const MRT_FRAGMENT_WGSL: &str = include_str!("shaders/mrt_fragment.wgsl");

/// Colors the MRT fragment stage writes, by attachment slot.
pub const ATTACHMENT_COLORS: [Color; 4] = [Color::RED, Color::GREEN, Color::BLUE, Color::GRAY];

/// Everything one window needs to render four targets and composite them.
pub struct MrtScene {
    program: ShaderProgram,
    target: OffscreenTarget,
    geometry: QuadGeometry,
    blit: BlitCompositor,
    clear: Color,
}

impl MrtScene {
    /// Builds the program, then allocates and validates the offscreen target.
    ///
    /// `dest_format` is the format of the views later passed to [`composite`](Self::composite).
    pub fn new(
        device: &wgpu::Device,
        dest_format: wgpu::TextureFormat,
        desc: TargetDesc,
    ) -> Result<Self> {
        let color_formats = desc.color_formats();
        let program = ShaderProgram::build(
            device,
            &ProgramDesc {
                label: "mrt",
                vertex_source: MRT_VERTEX_WGSL,
                fragment_source: MRT_FRAGMENT_WGSL,
                vertex_buffers: &[QuadVertex::layout()],
                color_formats: &color_formats,
            },
        )
        .context("failed to build MRT shader program")?;

        let target =
            OffscreenTarget::new(device, desc).context("failed to initialize MRT target")?;
        let geometry = QuadGeometry::new(device);
        let blit = BlitCompositor::new(device, &target, dest_format);

        log::info!(
            "MRT scene ready: {} x {}x{} {:?}",
            desc.attachments,
            desc.size.width,
            desc.size.height,
            desc.format
        );

        Ok(Self {
            program,
            target,
            geometry,
            blit,
            clear: Color::WHITE.with_alpha(0.0),
        })
    }

    pub fn target(&self) -> &OffscreenTarget {
        &self.target
    }

    /// Renders the quad into every offscreen attachment in one pass.
    pub fn render_offscreen(&self, encoder: &mut wgpu::CommandEncoder) {
        self.geometry.draw(
            encoder,
            &self.program,
            self.target.views(),
            self.target.size(),
            self.clear,
        );
    }

    /// Blits the offscreen attachments into the quadrants of `dest_view`.
    pub fn composite(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        dest_view: &wgpu::TextureView,
        dest_size: PixelSize,
    ) {
        self.blit.blit(encoder, dest_view, dest_size);
    }

    /// One full frame body: offscreen pass, then composite into `target`.
    pub fn draw(&self, target: &mut RenderTarget<'_>) {
        self.render_offscreen(target.encoder);
        self.composite(target.encoder, target.color_view, target.size);
    }
}
