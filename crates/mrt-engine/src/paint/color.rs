/// Linear straight-alpha RGBA color.
///
/// Channels are in `[0, 1]`. Conversion to 8-bit storage follows the usual
/// `round(c * 255)` rule used by unorm render targets.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const RED: Self = Self::rgba(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Self = Self::rgba(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Self = Self::rgba(0.0, 0.0, 1.0, 1.0);
    pub const GRAY: Self = Self::rgba(0.5, 0.5, 0.5, 1.0);
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Returns the 8-bit unorm encoding of this color.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

impl From<Color> for wgpu::Color {
    fn from(c: Color) -> Self {
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: c.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba8_rounds_to_nearest() {
        assert_eq!(Color::RED.to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(Color::GRAY.to_rgba8(), [128, 128, 128, 255]);
        assert_eq!(Color::rgba(2.0, -1.0, 0.25, 0.0).to_rgba8(), [255, 0, 64, 0]);
    }

    #[test]
    fn with_alpha_keeps_rgb() {
        let c = Color::WHITE.with_alpha(0.0);
        assert_eq!((c.r, c.g, c.b, c.a), (1.0, 1.0, 1.0, 0.0));
    }

    #[test]
    fn converts_to_wgpu_color() {
        let c: wgpu::Color = Color::GRAY.into();
        assert_eq!(
            c,
            wgpu::Color {
                r: 0.5,
                g: 0.5,
                b: 0.5,
                a: 1.0
            }
        );
    }
}
