//! Precomputed windowed quadrature coefficients.
//!
//! Each bar `k` correlates one window against a sine and a cosine completing
//! `k + 1` cycles per window, both shaped by a half-sine window `sin(πn/N)`.
//! Coefficients are scaled to ±127 and rounded so the hot loop is pure integer
//! multiply-accumulate.
//!
//! ```text
//! sin[k][n] = round(127 · sin(2π(k+1)n/N) · sin(πn/N))
//! cos[k][n] = round(127 · cos(2π(k+1)n/N) · sin(πn/N))
//! ```

use crate::error::{InitError, try_filled};
use alloc::vec::Vec;
use core::f64::consts::PI;
use libm::{cos, round, sin};

/// Divisor applied (truncating) to both running sums before squaring.
pub const GAIN: i32 = 2000;

/// Coefficient scale; `sin`/`cos` products are multiplied by this before rounding.
const SCALE: f64 = 127.0;

/// One cell of the correlation table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Coefficient {
    /// Windowed sine coefficient in [-127, 127].
    pub sin: i8,
    /// Windowed cosine coefficient in [-127, 127].
    pub cos: i8,
}

/// Immutable `bars × window_size` table of [`Coefficient`]s, row-major.
#[derive(Debug, Clone)]
pub struct CorrelationTable {
    cells: Vec<Coefficient>,
    window_size: usize,
    bars: usize,
}

impl CorrelationTable {
    /// Builds the table for the given window size and bar count.
    pub fn try_new(window_size: usize, bars: usize) -> Result<Self, InitError> {
        if window_size == 0 {
            return Err(InitError::ZeroWindow);
        }
        if bars == 0 {
            return Err(InitError::ZeroBars);
        }
        let len = window_size
            .checked_mul(bars)
            .ok_or(InitError::Allocation {
                what: "correlation table",
                len: usize::MAX,
            })?;
        let mut cells = try_filled(Coefficient::default(), len, "correlation table")?;

        let n_total = window_size as f64;
        for k in 0..bars {
            let cycles = analysis_cycles(k) as f64;
            let row = &mut cells[k * window_size..(k + 1) * window_size];
            for (n, cell) in row.iter_mut().enumerate() {
                let n = n as f64;
                let window = sin(PI * n / n_total);
                let phase = 2.0 * PI * cycles * n / n_total;
                *cell = Coefficient {
                    sin: round(SCALE * sin(phase) * window) as i8,
                    cos: round(SCALE * cos(phase) * window) as i8,
                };
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(window_size, bars, "correlation table built");

        Ok(Self {
            cells,
            window_size,
            bars,
        })
    }

    /// Coefficients for bar `k`, one per window position.
    ///
    /// # Panics
    ///
    /// Panics if `k >= self.bars()`.
    #[inline]
    pub fn row(&self, k: usize) -> &[Coefficient] {
        &self.cells[k * self.window_size..(k + 1) * self.window_size]
    }

    /// Coefficient for bar `k` at window position `n`, if in range.
    pub fn get(&self, k: usize, n: usize) -> Option<Coefficient> {
        if k < self.bars && n < self.window_size {
            Some(self.cells[k * self.window_size + n])
        } else {
            None
        }
    }

    /// Samples per window.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Number of bars (rows).
    pub fn bars(&self) -> usize {
        self.bars
    }

    /// Largest absolute coefficient anywhere in the table.
    pub fn max_abs(&self) -> i32 {
        self.cells
            .iter()
            .map(|c| i32::from(c.sin).abs().max(i32::from(c.cos).abs()))
            .max()
            .unwrap_or(0)
    }
}

/// Number of full cycles per window bar `k` is tuned to.
#[inline]
pub const fn analysis_cycles(k: usize) -> usize {
    k + 1
}
