//! Construction and configuration errors.
//!
//! Runtime conditions (a full or empty ring) are not errors in this sense; they
//! are reported as [`Underrun`](crate::Underrun) and [`Overrun`](crate::Overrun)
//! by the ring itself.

use alloc::vec::Vec;

/// Failure to build an engine component.
///
/// Any of these means the instance must not be used for processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// Window size was zero.
    ZeroWindow,
    /// Bar count was zero.
    ZeroBars,
    /// Ring capacity was zero.
    ZeroCapacity,
    /// A full window can never be buffered: window size exceeds ring capacity.
    WindowExceedsCapacity {
        /// Requested window size in samples.
        window_size: usize,
        /// Ring capacity in samples.
        capacity: usize,
    },
    /// A required allocation failed.
    Allocation {
        /// Which component was being allocated.
        what: &'static str,
        /// Number of elements requested.
        len: usize,
    },
}

#[cfg(feature = "std")]
impl std::fmt::Display for InitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ZeroWindow => write!(f, "window size must be at least 1 sample"),
            Self::ZeroBars => write!(f, "bar count must be at least 1"),
            Self::ZeroCapacity => write!(f, "ring capacity must be at least 1 sample"),
            Self::WindowExceedsCapacity {
                window_size,
                capacity,
            } => write!(
                f,
                "window of {window_size} samples does not fit a ring of {capacity}"
            ),
            Self::Allocation { what, len } => {
                write!(f, "failed to allocate {what} ({len} elements)")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InitError {}

/// A view geometry that cannot be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// View height must be at least 2 pixels.
    HeightTooSmall(i32),
    /// Width leaves no room for a 1-pixel bar plus gap per bar.
    WidthTooSmall {
        /// Requested view width.
        width: i32,
        /// Number of bars to fit.
        bars: usize,
    },
    /// No bars to lay out.
    NoBars,
    /// A required allocation failed.
    Allocation(usize),
    /// The view reaches past the i32 coordinate range.
    OutOfRange {
        /// First coordinate of the view along the offending axis.
        origin: i32,
        /// Pixel extent along that axis.
        extent: i32,
    },
}

#[cfg(feature = "std")]
impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::HeightTooSmall(h) => write!(f, "view height {h} is below 2 pixels"),
            Self::WidthTooSmall { width, bars } => {
                write!(f, "width {width} cannot hold {bars} bars of at least 1 pixel")
            }
            Self::NoBars => write!(f, "spectrum view needs at least one bar"),
            Self::Allocation(len) => write!(f, "failed to allocate geometry map ({len} entries)"),
            Self::OutOfRange { origin, extent } => write!(
                f,
                "view at {origin} spanning {extent} pixels leaves the coordinate range"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GeometryError {}

/// Allocates a vector filled with `value`, reporting allocation failure instead of aborting.
pub(crate) fn try_filled<T: Clone>(
    value: T,
    len: usize,
    what: &'static str,
) -> Result<Vec<T>, InitError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| InitError::Allocation { what, len })?;
    v.resize(len, value);
    Ok(v)
}
