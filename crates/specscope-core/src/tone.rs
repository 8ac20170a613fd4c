//! Synthetic test tone aimed at a single bar.

use crate::Sample;
use core::f64::consts::PI;
use libm::sin;

/// One window of a sine test tone.
///
/// `step = window_size / 2 · π / divisor` and sample `i` is
/// `trunc(127 · sin(i / step))`. Larger divisors give higher frequencies.
///
/// # Example
///
/// ```rust
/// use specscope_core::{divisor_for_bar, test_tone};
///
/// let tone: Vec<i8> = test_tone(64, divisor_for_bar(0)).collect();
/// assert_eq!(tone.len(), 64);
/// assert_eq!(tone[0], 0);
/// assert_eq!(tone[16], 127);
/// ```
pub fn test_tone(window_size: usize, divisor: f64) -> impl Iterator<Item = Sample> {
    let step = window_size as f64 / 2.0 * PI / divisor;
    (0..window_size).map(move |i| (127.0 * sin(i as f64 / step)) as Sample)
}

/// Divisor that makes [`test_tone`] complete `k + 1` cycles per window,
/// i.e. land on bar `k`.
pub fn divisor_for_bar(k: usize) -> f64 {
    (k + 1) as f64 * PI * PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn tone_cycles_match_bar() {
        for k in 0..6 {
            let tone: Vec<i8> = test_tone(128, divisor_for_bar(k)).collect();
            let rising_crossings = tone
                .windows(2)
                .filter(|w| w[0] < 0 && w[1] >= 0)
                .count();
            // The first cycle starts at 0 without a rising crossing.
            assert_eq!(rising_crossings, k, "bar {k}");
        }
    }

    #[test]
    fn tone_stays_in_range() {
        let tone: Vec<i8> = test_tone(256, 3.0).collect();
        assert!(tone.iter().all(|&s| s > -128));
        assert!(tone.iter().any(|&s| s != 0));
    }

    #[test]
    fn zero_divisor_is_silence() {
        assert!(test_tone(32, 0.0).all(|s| s == 0));
    }
}
