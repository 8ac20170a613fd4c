//! Diff-based waveform and bar renderers.
//!
//! Each renderer remembers what it last drew (one Y per waveform column, one
//! bar-top Y per bar) and only touches pixels that changed. A steady signal
//! therefore costs no draw calls at all after the first window.
//!
//! Views are optional. An unconfigured renderer accepts samples and magnitudes
//! and draws nothing, so processing never depends on what is on screen.

use crate::error::{GeometryError, InitError, try_filled};
use crate::geometry::{BarLayout, SpecMap, WaveMap, check_span};
use crate::surface::PixelSurface;
use crate::transform::WindowSink;
use crate::{Color, Sample};
use alloc::vec::Vec;

/// Colors for the waveform view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaveformColors {
    /// Trace color.
    pub fg: Color,
    /// Color of the resting midline.
    pub mid: Color,
    /// Background.
    pub bg: Color,
}

/// Colors for the spectrum view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpectrumColors {
    /// Bar color, also used for the baseline.
    pub fg: Color,
    /// Background.
    pub bg: Color,
}

/// Installed waveform geometry: origin X, Y map and colors.
#[derive(Debug, Clone)]
pub struct WaveformLayout {
    x: i32,
    map: WaveMap,
    colors: WaveformColors,
}

impl WaveformLayout {
    /// Builds the layout for a view at `(x, y)`, `height` pixels tall.
    pub fn new(
        x: i32,
        y: i32,
        height: i32,
        colors: WaveformColors,
    ) -> Result<Self, GeometryError> {
        Ok(Self {
            x,
            map: WaveMap::new(y, height)?,
            colors,
        })
    }

    /// Moves one column's trace point from `*prior_y` to `y`.
    ///
    /// Erases the old point (restoring the midline color if it sat on the
    /// midline), draws the new one, and records it. Does nothing when the
    /// point has not moved.
    #[inline]
    pub fn draw_sample<S: PixelSurface + ?Sized>(
        &self,
        surface: &mut S,
        x: i32,
        y: i32,
        prior_y: &mut i32,
    ) {
        if y == *prior_y {
            return;
        }
        let erase = if *prior_y == self.map.midline() {
            self.colors.mid
        } else {
            self.colors.bg
        };
        surface.draw_pixel(x, *prior_y, erase);
        surface.draw_pixel(x, y, self.colors.fg);
        *prior_y = y;
    }

    /// Left edge of the view.
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Sample-to-Y map.
    pub fn map(&self) -> &WaveMap {
        &self.map
    }

    /// View colors.
    pub fn colors(&self) -> WaveformColors {
        self.colors
    }
}

/// Installed spectrum geometry: bar placement, magnitude map and colors.
#[derive(Debug, Clone)]
pub struct SpectrumLayout {
    bars: BarLayout,
    map: SpecMap,
    colors: SpectrumColors,
}

impl SpectrumLayout {
    /// Builds the layout for `bars` bars in a `width × height` view at `(x, y)`.
    pub fn new(
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        bars: usize,
        colors: SpectrumColors,
    ) -> Result<Self, GeometryError> {
        Ok(Self {
            bars: BarLayout::new(x, width, bars)?,
            map: SpecMap::new(y, height)?,
            colors,
        })
    }

    /// Moves one bar's top from `*prior_top` to `top`.
    ///
    /// Growth fills `len + 1` rows from the new top in the foreground color;
    /// shrinkage fills `len` rows from the old top in the background color.
    #[inline]
    pub fn draw_bar<S: PixelSurface + ?Sized>(
        &self,
        surface: &mut S,
        x: i32,
        top: i32,
        prior_top: &mut i32,
    ) {
        if top == *prior_top {
            return;
        }
        let len = (top - *prior_top).abs();
        let width = self.bars.bar_width();
        if top <= *prior_top {
            surface.fill_rect(x, top, width, len + 1, self.colors.fg);
        } else {
            surface.fill_rect(x, *prior_top, width, len, self.colors.bg);
        }
        *prior_top = top;
    }

    /// Horizontal bar placement.
    pub fn bars(&self) -> &BarLayout {
        &self.bars
    }

    /// Magnitude-to-Y map.
    pub fn map(&self) -> &SpecMap {
        &self.map
    }

    /// View colors.
    pub fn colors(&self) -> SpectrumColors {
        self.colors
    }
}

/// Draws raw samples as a one-pixel trace, one column per window position.
#[derive(Debug, Clone)]
pub struct WaveformRenderer {
    prior: Vec<i32>,
    layout: Option<WaveformLayout>,
}

impl WaveformRenderer {
    /// Allocates per-column state for `window_size` columns; no view yet.
    pub fn try_new(window_size: usize) -> Result<Self, InitError> {
        if window_size == 0 {
            return Err(InitError::ZeroWindow);
        }
        Ok(Self {
            prior: try_filled(0, window_size, "waveform state")?,
            layout: None,
        })
    }

    /// Installs a new view and resets every column to the midline.
    ///
    /// On error the previous view stays installed.
    pub fn configure(
        &mut self,
        x: i32,
        y: i32,
        height: i32,
        colors: WaveformColors,
    ) -> Result<(), GeometryError> {
        check_span(x, i32::try_from(self.prior.len()).unwrap_or(i32::MAX))?;
        let layout = WaveformLayout::new(x, y, height, colors)?;
        self.prior.fill(layout.map().midline());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            x,
            y,
            height,
            midline = layout.map().midline(),
            "waveform view configured"
        );

        self.layout = Some(layout);
        Ok(())
    }

    /// Draws the sample at window position `column`.
    #[inline]
    pub fn plot<S: PixelSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        column: usize,
        sample: Sample,
    ) {
        let Some(layout) = &self.layout else {
            return;
        };
        if let Some(prior) = self.prior.get_mut(column) {
            let y = layout.map().y_for(sample);
            layout.draw_sample(surface, layout.x() + column as i32, y, prior);
        }
    }

    /// Repaints the view's box and midline, then resets the column state.
    pub fn clear<S: PixelSurface + ?Sized>(&mut self, surface: &mut S) {
        let Some(layout) = &self.layout else {
            return;
        };
        let map = layout.map();
        let colors = layout.colors();
        let columns = self.prior.len() as i32;
        surface.fill_rect(
            layout.x(),
            map.y_for(127) - 1,
            columns,
            map.y_for(-128) - map.y_for(127) + 2,
            colors.bg,
        );
        surface.fill_rect(layout.x(), map.midline(), columns, 1, colors.mid);
        self.prior.fill(map.midline());
    }

    /// Last drawn Y per column.
    pub fn prior(&self) -> &[i32] {
        &self.prior
    }

    /// The installed view, if any.
    pub fn layout(&self) -> Option<&WaveformLayout> {
        self.layout.as_ref()
    }

    /// Number of columns.
    pub fn window_size(&self) -> usize {
        self.prior.len()
    }
}

/// Draws per-bar magnitudes as vertical bars rising from a baseline.
#[derive(Debug, Clone)]
pub struct SpectrumRenderer {
    prior: Vec<i32>,
    layout: Option<SpectrumLayout>,
}

impl SpectrumRenderer {
    /// Allocates per-bar state for `bars` bars; no view yet.
    pub fn try_new(bars: usize) -> Result<Self, InitError> {
        if bars == 0 {
            return Err(InitError::ZeroBars);
        }
        Ok(Self {
            prior: try_filled(0, bars, "spectrum state")?,
            layout: None,
        })
    }

    /// Installs a new view and resets every bar to the baseline.
    ///
    /// On error the previous view stays installed.
    pub fn configure(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        colors: SpectrumColors,
    ) -> Result<(), GeometryError> {
        let layout = SpectrumLayout::new(x, y, width, height, self.prior.len(), colors)?;
        self.prior.fill(layout.map().baseline());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            x,
            y,
            width,
            height,
            bar_width = layout.bars().bar_width(),
            start_x = layout.bars().start_x(),
            "spectrum view configured"
        );

        self.layout = Some(layout);
        Ok(())
    }

    /// Draws bar `k` for a squared magnitude.
    #[inline]
    pub fn plot<S: PixelSurface + ?Sized>(&mut self, surface: &mut S, k: usize, magnitude: u32) {
        let Some(layout) = &self.layout else {
            return;
        };
        if let Some(prior) = self.prior.get_mut(k) {
            let top = layout.map().y_for(magnitude);
            layout.draw_bar(surface, layout.bars().bar_x(k), top, prior);
        }
    }

    /// Repaints the view's box and every bar's baseline, then resets bar state.
    pub fn clear<S: PixelSurface + ?Sized>(&mut self, surface: &mut S) {
        let Some(layout) = &self.layout else {
            return;
        };
        let bars = layout.bars();
        let map = layout.map();
        let colors = layout.colors();
        surface.fill_rect(
            bars.start_x(),
            map.peak(),
            bars.used_width(),
            map.baseline() - map.peak() + 1,
            colors.bg,
        );
        for k in 0..self.prior.len() {
            surface.fill_rect(bars.bar_x(k), map.baseline(), bars.bar_width(), 1, colors.fg);
        }
        self.prior.fill(map.baseline());
    }

    /// Last drawn bar-top Y per bar.
    pub fn prior(&self) -> &[i32] {
        &self.prior
    }

    /// The installed view, if any.
    pub fn layout(&self) -> Option<&SpectrumLayout> {
        self.layout.as_ref()
    }

    /// Number of bars.
    pub fn bars(&self) -> usize {
        self.prior.len()
    }
}

/// A pixel surface together with both renderers.
///
/// This is the sink a [`TransformEngine`](crate::TransformEngine) draws into:
/// samples go to the waveform, magnitudes to the spectrum.
#[derive(Debug, Clone)]
pub struct Display<S> {
    surface: S,
    waveform: WaveformRenderer,
    spectrum: SpectrumRenderer,
}

impl<S: PixelSurface> Display<S> {
    /// Wraps `surface` with renderers sized for `window_size` columns and `bars` bars.
    pub fn try_new(surface: S, window_size: usize, bars: usize) -> Result<Self, InitError> {
        Ok(Self {
            surface,
            waveform: WaveformRenderer::try_new(window_size)?,
            spectrum: SpectrumRenderer::try_new(bars)?,
        })
    }

    /// See [`WaveformRenderer::configure`].
    pub fn configure_waveform(
        &mut self,
        x: i32,
        y: i32,
        height: i32,
        colors: WaveformColors,
    ) -> Result<(), GeometryError> {
        self.waveform.configure(x, y, height, colors)
    }

    /// See [`SpectrumRenderer::configure`].
    pub fn configure_spectrum(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        colors: SpectrumColors,
    ) -> Result<(), GeometryError> {
        self.spectrum.configure(x, y, width, height, colors)
    }

    /// Repaints the waveform view. No-op when unconfigured.
    pub fn clear_waveform(&mut self) {
        self.waveform.clear(&mut self.surface);
    }

    /// Repaints the spectrum view. No-op when unconfigured.
    pub fn clear_spectrum(&mut self) {
        self.spectrum.clear(&mut self.surface);
    }

    /// The surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The surface, mutably. Drawing through it bypasses the diff state.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Unwraps the surface.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Waveform renderer state.
    pub fn waveform(&self) -> &WaveformRenderer {
        &self.waveform
    }

    /// Spectrum renderer state.
    pub fn spectrum(&self) -> &SpectrumRenderer {
        &self.spectrum
    }
}

impl<S: PixelSurface> WindowSink for Display<S> {
    #[inline]
    fn sample(&mut self, column: usize, sample: Sample) {
        self.waveform.plot(&mut self.surface, column, sample);
    }

    #[inline]
    fn bar(&mut self, k: usize, magnitude: u32) {
        self.spectrum.plot(&mut self.surface, k, magnitude);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{CountingSurface, DrawCounts, Framebuffer};

    const WAVE: WaveformColors = WaveformColors {
        fg: 0xFF,
        mid: 0x80,
        bg: 0x01,
    };
    const SPEC: SpectrumColors = SpectrumColors { fg: 0xAA, bg: 0x02 };

    fn counting(w: usize, h: usize) -> CountingSurface<Framebuffer> {
        CountingSurface::new(Framebuffer::new(w, h))
    }

    #[test]
    fn draw_sample_moves_point() {
        let layout = WaveformLayout::new(0, 0, 64, WAVE).unwrap();
        let mid = layout.map().midline();
        let mut surface = counting(8, 64);
        let mut prior = mid;

        layout.draw_sample(&mut surface, 3, 10, &mut prior);
        assert_eq!(prior, 10);
        assert_eq!(surface.inner().pixel(3, mid), Some(WAVE.mid));
        assert_eq!(surface.inner().pixel(3, 10), Some(WAVE.fg));

        layout.draw_sample(&mut surface, 3, 20, &mut prior);
        assert_eq!(surface.inner().pixel(3, 10), Some(WAVE.bg));
        assert_eq!(surface.inner().pixel(3, 20), Some(WAVE.fg));
        assert_eq!(surface.counts(), DrawCounts { pixels: 4, rects: 0 });
    }

    #[test]
    fn draw_sample_is_idempotent() {
        let layout = WaveformLayout::new(0, 0, 64, WAVE).unwrap();
        let mut surface = counting(8, 64);
        let mut prior = layout.map().midline();
        layout.draw_sample(&mut surface, 0, 5, &mut prior);
        surface.reset();
        layout.draw_sample(&mut surface, 0, 5, &mut prior);
        assert_eq!(surface.counts().total(), 0);
    }

    #[test]
    fn draw_bar_growth_and_shrink() {
        let layout = SpectrumLayout::new(0, 0, 81, 64, 8, SPEC).unwrap();
        let baseline = layout.map().baseline();
        let mut surface = counting(96, 64);
        let mut prior = baseline;

        // Grow by 10: covers rows baseline-10..=baseline.
        layout.draw_bar(&mut surface, 1, baseline - 10, &mut prior);
        assert_eq!(prior, baseline - 10);
        for y in baseline - 10..=baseline {
            assert_eq!(surface.inner().pixel(1, y), Some(SPEC.fg), "row {y}");
        }

        // Shrink by 4: clears rows baseline-10..baseline-7, keeps the new top.
        layout.draw_bar(&mut surface, 1, baseline - 6, &mut prior);
        for y in baseline - 10..baseline - 6 {
            assert_eq!(surface.inner().pixel(1, y), Some(SPEC.bg), "row {y}");
        }
        assert_eq!(surface.inner().pixel(1, baseline - 6), Some(SPEC.fg));
        assert_eq!(surface.counts(), DrawCounts { pixels: 0, rects: 2 });

        surface.reset();
        layout.draw_bar(&mut surface, 1, baseline - 6, &mut prior);
        assert_eq!(surface.counts().total(), 0);
    }

    #[test]
    fn unconfigured_views_draw_nothing() {
        let mut display = Display::try_new(counting(16, 16), 8, 4).unwrap();
        for n in 0..8 {
            display.sample(n, 100);
        }
        display.bar(0, 5000);
        display.clear_waveform();
        display.clear_spectrum();
        assert_eq!(display.surface().counts().total(), 0);
    }

    #[test]
    fn configure_resets_prior_state() {
        let mut display = Display::try_new(counting(96, 200), 64, 8).unwrap();
        display.configure_waveform(0, 0, 64, WAVE).unwrap();
        display.configure_spectrum(0, 100, 81, 64, SPEC).unwrap();
        let mid = display.waveform().layout().unwrap().map().midline();
        assert!(display.waveform().prior().iter().all(|&y| y == mid));
        assert!(display.spectrum().prior().iter().all(|&y| y == 163));

        display.sample(0, 127);
        display.bar(0, 100);
        assert_ne!(display.waveform().prior()[0], mid);
        assert_ne!(display.spectrum().prior()[0], 163);

        display.configure_waveform(0, 0, 64, WAVE).unwrap();
        display.configure_spectrum(0, 100, 81, 64, SPEC).unwrap();
        assert_eq!(display.waveform().prior()[0], mid);
        assert_eq!(display.spectrum().prior()[0], 163);
    }

    #[test]
    fn failed_configure_keeps_previous_view() {
        let mut renderer = SpectrumRenderer::try_new(8).unwrap();
        renderer.configure(0, 0, 81, 64, SPEC).unwrap();
        let err = renderer.configure(0, 0, 10, 64, SPEC).unwrap_err();
        assert_eq!(err, GeometryError::WidthTooSmall { width: 10, bars: 8 });
        assert_eq!(renderer.layout().unwrap().bars().bar_width(), 9);
    }

    #[test]
    fn waveform_columns_must_fit_the_coordinate_range() {
        let mut renderer = WaveformRenderer::try_new(64).unwrap();
        renderer.configure(0, 0, 64, WAVE).unwrap();
        let err = renderer.configure(i32::MAX - 32, 0, 64, WAVE).unwrap_err();
        assert_eq!(
            err,
            GeometryError::OutOfRange {
                origin: i32::MAX - 32,
                extent: 64
            }
        );
        assert_eq!(renderer.layout().unwrap().x(), 0);
    }

    #[test]
    fn clear_spectrum_paints_baselines() {
        let mut display = Display::try_new(counting(96, 200), 64, 8).unwrap();
        display.configure_spectrum(0, 100, 81, 64, SPEC).unwrap();
        display.bar(3, 3000);
        display.surface_mut().reset();

        display.clear_spectrum();
        // One background box plus one baseline per bar.
        assert_eq!(display.surface().counts(), DrawCounts { pixels: 0, rects: 9 });
        let fb = display.surface().inner();
        assert_eq!(fb.pixel(31, 140), Some(SPEC.bg));
        assert_eq!(fb.pixel(31, 163), Some(SPEC.fg));
        // Gap column between bars 0 and 1 stays background on the baseline row.
        assert_eq!(fb.pixel(10, 163), Some(SPEC.bg));
        assert!(display.spectrum().prior().iter().all(|&y| y == 163));
    }

    #[test]
    fn clear_waveform_paints_midline() {
        let mut display = Display::try_new(Framebuffer::new(64, 80), 64, 8).unwrap();
        display.configure_waveform(0, 10, 64, WAVE).unwrap();
        display.sample(5, -100);
        display.clear_waveform();

        let mid = display.waveform().layout().unwrap().map().midline();
        let fb = display.surface();
        for x in 0..64 {
            assert_eq!(fb.pixel(x, mid), Some(WAVE.mid));
        }
        assert_eq!(fb.pixel(5, mid + 10), Some(WAVE.bg));
        assert_eq!(fb.pixel(0, 9), Some(WAVE.bg));
        assert!(display.waveform().prior().iter().all(|&y| y == mid));
    }
}
