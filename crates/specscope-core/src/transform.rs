//! Windowed transform engine.
//!
//! One call consumes exactly one window from a [`SampleSource`] and produces
//! one squared magnitude per bar. Samples are forwarded to the sink as they
//! are popped (bar 0's pass), magnitudes as each bar completes.
//!
//! ```text
//! a = Σ sin[k][n] · x[n]      b = Σ cos[k][n] · x[n]
//! a /= GAIN                   b /= GAIN
//! magnitude[k] = a² + b²
//! ```

use crate::correlation::{Coefficient, CorrelationTable, GAIN};
use crate::error::{InitError, try_filled};
use crate::ring::{Overrun, SampleSource};
use crate::Sample;
use alloc::vec::Vec;

/// Receives the products of one window as the engine produces them.
pub trait WindowSink {
    /// Sample at window position `column` was consumed.
    fn sample(&mut self, column: usize, sample: Sample);

    /// Bar `k` finished with squared magnitude `magnitude`.
    fn bar(&mut self, k: usize, magnitude: u32);
}

/// Discards everything.
impl WindowSink for () {
    #[inline]
    fn sample(&mut self, _column: usize, _sample: Sample) {}

    #[inline]
    fn bar(&mut self, _k: usize, _magnitude: u32) {}
}

impl<K: WindowSink + ?Sized> WindowSink for &mut K {
    #[inline]
    fn sample(&mut self, column: usize, sample: Sample) {
        (**self).sample(column, sample);
    }

    #[inline]
    fn bar(&mut self, k: usize, magnitude: u32) {
        (**self).bar(k, magnitude);
    }
}

/// Correlation table plus reusable window and magnitude buffers.
///
/// # Example
///
/// ```rust
/// use specscope_core::{SampleRing, TransformEngine};
///
/// let mut ring = SampleRing::try_new(64).unwrap();
/// let mut engine = TransformEngine::try_new(32, 4).unwrap();
/// for _ in 0..32 {
///     ring.push(0).unwrap();
/// }
/// let magnitudes = engine.process_window(&mut ring, &mut ()).unwrap();
/// assert_eq!(magnitudes, &[0, 0, 0, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct TransformEngine {
    table: CorrelationTable,
    window: Vec<Sample>,
    magnitudes: Vec<u32>,
}

impl TransformEngine {
    /// Builds the table and buffers for `window_size` samples and `bars` bars.
    pub fn try_new(window_size: usize, bars: usize) -> Result<Self, InitError> {
        let table = CorrelationTable::try_new(window_size, bars)?;
        let window = try_filled(0, window_size, "window buffer")?;
        let magnitudes = try_filled(0, bars, "magnitude buffer")?;

        #[cfg(feature = "tracing")]
        tracing::debug!(window_size, bars, "transform engine ready");

        Ok(Self {
            table,
            window,
            magnitudes,
        })
    }

    /// Processes one window.
    ///
    /// Pops `window_size` samples, forwarding each to `sink`, then correlates
    /// the window against every bar and forwards each magnitude.
    ///
    /// On [`Overrun`] the window is abandoned at the failing pop: samples
    /// already forwarded stay forwarded, no bar is reported, and the
    /// magnitudes of the previous window are kept.
    pub fn process_window<S, K>(
        &mut self,
        source: &mut S,
        sink: &mut K,
    ) -> Result<&[u32], Overrun>
    where
        S: SampleSource + ?Sized,
        K: WindowSink + ?Sized,
    {
        for k in 0..self.table.bars() {
            if k == 0 {
                for (n, slot) in self.window.iter_mut().enumerate() {
                    let sample = source.pop()?;
                    *slot = sample;
                    sink.sample(n, sample);
                }
            }

            let magnitude = correlate(self.table.row(k), &self.window);
            self.magnitudes[k] = magnitude;
            sink.bar(k, magnitude);
        }
        Ok(&self.magnitudes)
    }

    /// Magnitudes of the last completed window (zeros before the first).
    pub fn magnitudes(&self) -> &[u32] {
        &self.magnitudes
    }

    /// Samples of the last window, including a partial one cut short by overrun.
    pub fn window(&self) -> &[Sample] {
        &self.window
    }

    /// Samples consumed per window.
    pub fn window_size(&self) -> usize {
        self.table.window_size()
    }

    /// Number of bars.
    pub fn bars(&self) -> usize {
        self.table.bars()
    }

    /// The coefficient table.
    pub fn table(&self) -> &CorrelationTable {
        &self.table
    }
}

/// Squared, gain-scaled magnitude of one window against one table row.
///
/// Sums are carried in `i64` and the squared magnitude saturates at
/// `u32::MAX`. Up to 2048 samples every intermediate also fits an `i32`, so
/// the result equals 32-bit accumulation there.
#[inline]
fn correlate(row: &[Coefficient], window: &[Sample]) -> u32 {
    let mut a: i64 = 0;
    let mut b: i64 = 0;
    for (c, &x) in row.iter().zip(window) {
        let x = i64::from(x);
        a += i64::from(c.sin) * x;
        b += i64::from(c.cos) * x;
    }
    let gain = i64::from(GAIN);
    a /= gain;
    b /= gain;
    let magnitude = a.saturating_mul(a).saturating_add(b.saturating_mul(b));
    u32::try_from(magnitude).unwrap_or(u32::MAX)
}
