//! Pixel surface capability and two in-crate surfaces.
//!
//! The renderers need exactly two primitives: set one pixel and fill an
//! axis-aligned rectangle. Anything providing them (a TFT driver, a window
//! texture, an in-memory buffer) can host the views.

use crate::Color;
use alloc::vec::Vec;

/// The drawing operations the renderers issue.
///
/// Coordinates are signed; implementations clip anything outside their bounds.
pub trait PixelSurface {
    /// Sets a single pixel.
    fn draw_pixel(&mut self, x: i32, y: i32, color: Color);

    /// Fills a `w × h` rectangle with its top-left corner at `(x, y)`.
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color);
}

impl<S: PixelSurface + ?Sized> PixelSurface for &mut S {
    #[inline]
    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        (**self).draw_pixel(x, y, color);
    }

    #[inline]
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        (**self).fill_rect(x, y, w, h, color);
    }
}

/// Row-major in-memory surface.
///
/// Colors are stored as given; frame exporters read them as `0xRRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Framebuffer {
    /// Creates a `width × height` buffer filled with color 0.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: alloc::vec![0; width * height],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Color at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Paints the whole buffer one color.
    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}

impl PixelSurface for Framebuffer {
    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        if w <= 0 || h <= 0 {
            return;
        }
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = (i64::from(x) + i64::from(w)).clamp(0, self.width as i64) as usize;
        let y1 = (i64::from(y) + i64::from(h)).clamp(0, self.height as i64) as usize;
        if x0 >= x1 {
            return;
        }
        for row in y0..y1 {
            let start = row * self.width;
            self.pixels[start + x0..start + x1].fill(color);
        }
    }
}

/// Tally of operations issued to a [`CountingSurface`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawCounts {
    /// `draw_pixel` calls.
    pub pixels: u64,
    /// `fill_rect` calls.
    pub rects: u64,
}

impl DrawCounts {
    /// Total draw calls of either kind.
    pub fn total(&self) -> u64 {
        self.pixels + self.rects
    }
}

/// Forwards to an inner surface while counting calls.
#[derive(Debug, Clone, Default)]
pub struct CountingSurface<S> {
    inner: S,
    counts: DrawCounts,
}

impl<S> CountingSurface<S> {
    /// Wraps `inner` with zeroed counters.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            counts: DrawCounts::default(),
        }
    }

    /// Calls seen since construction or the last [`reset`](Self::reset).
    pub fn counts(&self) -> DrawCounts {
        self.counts
    }

    /// Zeroes the counters.
    pub fn reset(&mut self) {
        self.counts = DrawCounts::default();
    }

    /// The wrapped surface.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwraps the surface, discarding the counters.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: PixelSurface> PixelSurface for CountingSurface<S> {
    #[inline]
    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.counts.pixels += 1;
        self.inner.draw_pixel(x, y, color);
    }

    #[inline]
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        self.counts.rects += 1;
        self.inner.fill_rect(x, y, w, h, color);
    }
}

/// A surface that discards everything; counts only make sense wrapped.
impl PixelSurface for () {
    #[inline]
    fn draw_pixel(&mut self, _x: i32, _y: i32, _color: Color) {}

    #[inline]
    fn fill_rect(&mut self, _x: i32, _y: i32, _w: i32, _h: i32, _color: Color) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_roundtrip_and_clipping() {
        let mut fb = Framebuffer::new(4, 3);
        fb.draw_pixel(1, 2, 7);
        fb.draw_pixel(-1, 0, 9);
        fb.draw_pixel(4, 0, 9);
        assert_eq!(fb.pixel(1, 2), Some(7));
        assert_eq!(fb.pixel(4, 0), None);
        assert_eq!(fb.pixels().iter().filter(|&&c| c == 9).count(), 0);
    }

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut fb = Framebuffer::new(5, 5);
        fb.fill_rect(3, 3, 10, 10, 1);
        assert_eq!(fb.pixels().iter().filter(|&&c| c == 1).count(), 4);
        fb.fill_rect(-2, -2, 3, 3, 2);
        assert_eq!(fb.pixel(0, 0), Some(2));
        assert_eq!(fb.pixels().iter().filter(|&&c| c == 2).count(), 1);
    }

    #[test]
    fn fill_rect_ignores_empty() {
        let mut fb = Framebuffer::new(3, 3);
        fb.fill_rect(0, 0, 0, 3, 1);
        fb.fill_rect(0, 0, 3, -1, 1);
        assert!(fb.pixels().iter().all(|&c| c == 0));
    }

    #[test]
    fn counting_surface_forwards() {
        let mut counting = CountingSurface::new(Framebuffer::new(8, 8));
        counting.draw_pixel(0, 0, 3);
        counting.fill_rect(1, 1, 2, 2, 4);
        counting.fill_rect(1, 1, 2, 2, 4);
        assert_eq!(counting.counts(), DrawCounts { pixels: 1, rects: 2 });
        assert_eq!(counting.counts().total(), 3);
        assert_eq!(counting.inner().pixel(2, 2), Some(4));

        counting.reset();
        assert_eq!(counting.counts().total(), 0);
        assert_eq!(counting.into_inner().pixel(0, 0), Some(3));
    }

    #[test]
    fn borrowed_surface_draws_through() {
        fn paint<S: PixelSurface>(mut surface: S) {
            surface.draw_pixel(1, 1, 5);
        }
        let mut fb = Framebuffer::new(2, 2);
        paint(&mut fb);
        assert_eq!(fb.pixel(1, 1), Some(5));
    }
}
