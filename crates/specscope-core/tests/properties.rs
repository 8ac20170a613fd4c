//! Property-based tests for specscope-core.
//!
//! Ring buffer bookkeeping under random push/pop interleavings, geometry map
//! monotonicity and range for arbitrary view placements, and diff renderer
//! idempotence.

use proptest::prelude::*;
use specscope_core::{
    BarLayout, CorrelationTable, CountingSurface, Framebuffer, SampleRing, SpecMap, SpectrumLayout,
    SpectrumColors, WaveMap, WaveformColors, WaveformLayout,
};

/// A producer or consumer step.
#[derive(Debug, Clone)]
enum Op {
    Push(i8),
    Pop,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![any::<i8>().prop_map(Op::Push), Just(Op::Pop)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Count equals accepted pushes minus successful pops; offsets stay in
    /// range and satisfy write == (read + count) mod capacity.
    #[test]
    fn ring_bookkeeping(
        capacity in 1usize..64,
        ops in prop::collection::vec(op(), 0..400),
    ) {
        let mut ring = SampleRing::try_new(capacity).unwrap();
        let mut model = std::collections::VecDeque::new();
        let mut accepted = 0usize;
        let mut read = 0usize;

        for op in ops {
            match op {
                Op::Push(s) => {
                    let result = ring.push(s);
                    if model.len() < capacity {
                        prop_assert!(result.is_ok());
                        model.push_back(s);
                        accepted += 1;
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
                Op::Pop => {
                    let result = ring.pop();
                    match model.pop_front() {
                        Some(expected) => {
                            prop_assert_eq!(result, Ok(expected));
                            read += 1;
                        }
                        None => prop_assert!(result.is_err()),
                    }
                }
            }

            prop_assert_eq!(ring.len(), accepted - read);
            prop_assert!(ring.len() <= ring.capacity());
            prop_assert!(ring.read_offset() < capacity);
            prop_assert!(ring.write_offset() < capacity);
            prop_assert_eq!(
                ring.write_offset(),
                (ring.read_offset() + ring.len()) % capacity
            );
        }
    }

    /// Every wave map entry lies inside the view, and Y never increases as
    /// the sample value rises.
    #[test]
    fn wave_map_in_range_and_monotonic(y in -500i32..500, height in 2i32..400) {
        let map = WaveMap::new(y, height).unwrap();
        prop_assert!(map.y_for(-128) > map.y_for(127));
        let mut prev = i32::MAX;
        for s in i8::MIN..=i8::MAX {
            let v = map.y_for(s);
            prop_assert!(v >= y && v <= y + height - 1, "y_for({}) = {}", s, v);
            prop_assert!(v <= prev);
            prev = v;
        }
    }

    /// Spec map has (h-1)^2 entries, is non-increasing and stays in the view.
    #[test]
    fn spec_map_in_range_and_monotonic(y in -500i32..500, height in 2i32..200) {
        let map = SpecMap::new(y, height).unwrap();
        let span = (height - 1) as usize;
        prop_assert_eq!(map.len(), span * span);
        prop_assert_eq!(map.baseline(), y + height - 1);
        prop_assert_eq!(map.peak(), y);
        for pair in map.as_slice().windows(2) {
            prop_assert!(pair[1] <= pair[0]);
        }
        for &v in map.as_slice() {
            prop_assert!(v >= y && v <= y + height - 1);
        }
    }

    /// Bars never spill past the view's right edge.
    #[test]
    fn bar_layout_fits_view(x in -100i32..100, width in 1i32..1000, bars in 1usize..64) {
        if let Ok(layout) = BarLayout::new(x, width, bars) {
            prop_assert!(layout.bar_width() >= 1);
            prop_assert!(layout.start_x() > x);
            prop_assert!(layout.used_width() <= width - 1);
            let last = layout.bar_x(bars - 1);
            prop_assert!(last + layout.bar_width() <= x + width);
        }
    }

    /// Repeating the same draw with the same prior state issues no draw calls.
    #[test]
    fn diff_draws_are_idempotent(sample in any::<i8>(), magnitude in any::<u32>()) {
        let wave = WaveformLayout::new(0, 0, 64, WaveformColors { fg: 1, mid: 2, bg: 3 }).unwrap();
        let spec = SpectrumLayout::new(0, 64, 81, 64, 8, SpectrumColors { fg: 1, bg: 3 }).unwrap();
        let mut surface = CountingSurface::new(Framebuffer::new(96, 128));

        let mut prior_y = wave.map().midline();
        let y = wave.map().y_for(sample);
        wave.draw_sample(&mut surface, 0, y, &mut prior_y);
        let mut prior_top = spec.map().baseline();
        let top = spec.map().y_for(magnitude);
        spec.draw_bar(&mut surface, 1, top, &mut prior_top);

        surface.reset();
        wave.draw_sample(&mut surface, 0, y, &mut prior_y);
        spec.draw_bar(&mut surface, 1, top, &mut prior_top);
        prop_assert_eq!(surface.counts().total(), 0);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    /// No coefficient ever exceeds the ±127 scale.
    #[test]
    fn coefficients_bounded(window in 1usize..512, bars in 1usize..32) {
        let table = CorrelationTable::try_new(window, bars).unwrap();
        prop_assert!(table.max_abs() <= 127);
    }
}
