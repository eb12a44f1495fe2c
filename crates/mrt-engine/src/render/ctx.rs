use crate::coords::PixelSize;

/// Target for drawing (encoder + color view + its size).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub size: PixelSize,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
        size: PixelSize,
    ) -> Self {
        Self {
            encoder,
            color_view,
            size,
        }
    }
}
