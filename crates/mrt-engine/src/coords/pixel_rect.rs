/// Size in physical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for PixelSize {
    fn from(s: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(s.width, s.height)
    }
}

/// Axis-aligned rectangle in physical pixels (top-left origin, +Y down).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Builds a rectangle from half-open corner coordinates `[x0, x1) × [y0, y1)`.
    ///
    /// Inverted corners produce an empty rectangle.
    #[inline]
    pub const fn from_corners(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self {
            x: x0,
            y: y0,
            width: x1.saturating_sub(x0),
            height: y1.saturating_sub(y0),
        }
    }

    #[inline]
    pub const fn size(self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }

    #[inline]
    pub const fn right(self) -> u32 {
        self.x + self.width
    }

    #[inline]
    pub const fn bottom(self) -> u32 {
        self.y + self.height
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub const fn contains(self, px: u32, py: u32) -> bool {
        px >= self.x && py >= self.y && px < self.right() && py < self.bottom()
    }

    /// Shrinks the rectangle by `n` pixels on every side.
    ///
    /// Returns an empty rectangle centered in `self` when `n` is too large.
    #[inline]
    pub fn inset(self, n: u32) -> Self {
        let w = self.width.saturating_sub(2 * n);
        let h = self.height.saturating_sub(2 * n);
        Self::new(
            self.x + n.min(self.width / 2),
            self.y + n.min(self.height / 2),
            w,
            h,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_corners_is_half_open() {
        let r = PixelRect::from_corners(200, 0, 400, 200);
        assert_eq!(r, PixelRect::new(200, 0, 200, 200));
        assert!(r.contains(200, 0));
        assert!(!r.contains(400, 0));
        assert!(!r.contains(200, 200));
    }

    #[test]
    fn inverted_corners_are_empty() {
        assert!(PixelRect::from_corners(10, 10, 5, 20).is_empty());
        assert!(PixelRect::from_corners(0, 10, 5, 10).is_empty());
    }

    #[test]
    fn inset_shrinks_every_side() {
        let r = PixelRect::new(0, 200, 200, 200).inset(2);
        assert_eq!(r, PixelRect::new(2, 202, 196, 196));
    }

    #[test]
    fn oversized_inset_is_empty() {
        let r = PixelRect::new(10, 10, 3, 3).inset(5);
        assert!(r.is_empty());
    }

    #[test]
    fn size_area() {
        assert_eq!(PixelSize::new(400, 400).area(), 160_000);
        assert!(PixelSize::new(0, 400).is_empty());
    }
}
