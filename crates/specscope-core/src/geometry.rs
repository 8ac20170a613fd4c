//! Screen geometry for the two views.
//!
//! Maps are precomputed once per (re)configuration so the per-window draw path
//! is a table lookup. Y grows downward, as on every raster surface.

use crate::Sample;
use crate::error::GeometryError;
use alloc::vec::Vec;
use libm::{floor, sqrt};

/// Sample value to waveform Y coordinate.
///
/// Linear map of [-128, 127] onto [bottom, top] with truncating integer
/// division, indexed by the sample's unsigned byte representation.
#[derive(Debug, Clone)]
pub struct WaveMap {
    map: [i32; 256],
    top: i32,
    bottom: i32,
}

impl WaveMap {
    /// Builds the map for a view starting at `y` and `height` pixels tall.
    pub fn new(y: i32, height: i32) -> Result<Self, GeometryError> {
        if height < 2 {
            return Err(GeometryError::HeightTooSmall(height));
        }
        check_span(y, height)?;
        let top = i64::from(y);
        let bottom = top + i64::from(height) - 1;
        let mut map = [0i32; 256];
        for (b, slot) in map.iter_mut().enumerate() {
            let s = i64::from(b as u8 as i8);
            // Lands in [top, bottom], which `check_span` keeps inside i32.
            *slot = (((s + 128) * (top - bottom)) / 255 + bottom) as i32;
        }
        Ok(Self {
            map,
            top: y,
            bottom: bottom as i32,
        })
    }

    /// Y coordinate for a sample.
    #[inline]
    pub fn y_for(&self, sample: Sample) -> i32 {
        self.map[usize::from(sample as u8)]
    }

    /// Y coordinate of sample 0, the resting trace.
    #[inline]
    pub fn midline(&self) -> i32 {
        self.y_for(0)
    }

    /// Topmost row of the view (sample 127).
    pub fn top(&self) -> i32 {
        self.top
    }

    /// Bottom row of the view (sample -128).
    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    /// The raw 256-entry table, indexed by `sample as u8`.
    pub fn as_slice(&self) -> &[i32] {
        &self.map
    }
}

/// Bar magnitude to bar-top Y coordinate.
///
/// `map[i] = floor(y + (height - 1) - sqrt(i))` over `(height - 1)²` entries,
/// so a full-height bar needs a squared magnitude of `(height - 1)²`. The
/// floor applies to the whole difference: magnitudes 2 and 3 already lift a
/// bar two rows above its baseline.
#[derive(Debug, Clone)]
pub struct SpecMap {
    map: Vec<i32>,
}

impl SpecMap {
    /// Builds the map for a view starting at `y` and `height` pixels tall.
    pub fn new(y: i32, height: i32) -> Result<Self, GeometryError> {
        if height < 2 {
            return Err(GeometryError::HeightTooSmall(height));
        }
        check_span(y, height)?;
        let span = (height - 1) as usize;
        let len = span
            .checked_mul(span)
            .ok_or(GeometryError::Allocation(usize::MAX))?;

        let mut map = Vec::new();
        map.try_reserve_exact(len)
            .map_err(|_| GeometryError::Allocation(len))?;
        let baseline = f64::from(y) + f64::from(height - 1);
        map.extend((0..len).map(|i| floor(baseline - sqrt(i as f64)) as i32));

        Ok(Self { map })
    }

    /// Bar-top Y for a magnitude; magnitudes past the end clamp to the peak.
    #[inline]
    pub fn y_for(&self, magnitude: u32) -> i32 {
        let i = (magnitude as usize).min(self.map.len() - 1);
        self.map[i]
    }

    /// Y of an empty bar (magnitude 0).
    #[inline]
    pub fn baseline(&self) -> i32 {
        self.map[0]
    }

    /// Y of a saturated bar.
    #[inline]
    pub fn peak(&self) -> i32 {
        self.map[self.map.len() - 1]
    }

    /// Number of entries, `(height - 1)²`.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Always false; a valid map has at least one entry.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The raw table.
    pub fn as_slice(&self) -> &[i32] {
        &self.map
    }
}

/// Horizontal placement of the bars, centered in the view.
///
/// Each bar is `bar_width` pixels followed by a 1-pixel gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarLayout {
    start_x: i32,
    bar_width: i32,
    bars: usize,
}

impl BarLayout {
    /// Lays out `bars` bars across a view at `x`, `width` pixels wide.
    pub fn new(x: i32, width: i32, bars: usize) -> Result<Self, GeometryError> {
        if bars == 0 {
            return Err(GeometryError::NoBars);
        }
        let too_small = GeometryError::WidthTooSmall { width, bars };
        let n = i32::try_from(bars).map_err(|_| too_small)?;
        if width < 1 {
            return Err(too_small);
        }
        check_span(x, width)?;
        let bar_width = (width - 1) / n - 1;
        if bar_width < 1 {
            return Err(too_small);
        }
        let start_x = x + 1 + (width - 1 - n * (bar_width + 1)) / 2;
        Ok(Self {
            start_x,
            bar_width,
            bars,
        })
    }

    /// Width of each bar in pixels.
    #[inline]
    pub fn bar_width(&self) -> i32 {
        self.bar_width
    }

    /// X of the first bar.
    #[inline]
    pub fn start_x(&self) -> i32 {
        self.start_x
    }

    /// X of bar `k`.
    #[inline]
    pub fn bar_x(&self, k: usize) -> i32 {
        self.start_x + k as i32 * (self.bar_width + 1)
    }

    /// Number of bars laid out.
    pub fn bars(&self) -> usize {
        self.bars
    }

    /// Pixels covered by all bars including their gaps.
    pub fn used_width(&self) -> i32 {
        self.bars as i32 * (self.bar_width + 1)
    }
}

/// Rejects a view whose pixels, plus the one-pixel border the clears paint,
/// would fall outside the i32 coordinate range.
pub(crate) fn check_span(origin: i32, extent: i32) -> Result<(), GeometryError> {
    let first = i64::from(origin) - 1;
    let past_end = i64::from(origin) + i64::from(extent);
    if first < i64::from(i32::MIN) || past_end > i64::from(i32::MAX) || extent > i32::MAX - 2 {
        return Err(GeometryError::OutOfRange { origin, extent });
    }
    Ok(())
}
