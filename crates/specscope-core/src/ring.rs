//! Fixed-capacity sample FIFO between the producer and the transform engine.
//!
//! [`SampleRing`] is a plain circular buffer with no synchronization of its own.
//! Exactly one producer pushes and exactly one consumer pops; the `std` runtime
//! wraps it in a lock scoped to each single push/pop so the producer never waits
//! for a whole window to be processed.
//!
//! Both failure modes are transient and carry no payload:
//!
//! - [`Underrun`]: the ring is full when a sample arrives. The sample is dropped
//!   and nothing already buffered is overwritten.
//! - [`Overrun`]: the ring is empty when the consumer needs a sample mid-window.
//!   Offsets and count are left untouched.

use crate::error::{InitError, try_filled};
use crate::Sample;
use alloc::vec::Vec;

/// Producer-side condition: the ring was full and the sample was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Underrun;

/// Consumer-side condition: the ring ran dry in the middle of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overrun;

#[cfg(feature = "std")]
impl std::fmt::Display for Underrun {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "underrun: sample buffer full, sample dropped")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Underrun {}

#[cfg(feature = "std")]
impl std::fmt::Display for Overrun {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "overrun: sample buffer empty mid-window")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Overrun {}

/// Anything the transform engine can pull samples from.
pub trait SampleSource {
    /// Removes and returns the oldest buffered sample.
    fn pop(&mut self) -> Result<Sample, Overrun>;
}

/// Circular FIFO of signed 8-bit samples.
///
/// # Invariants
///
/// - `0 <= len() <= capacity()`
/// - `read_offset() < capacity()` and `write_offset() < capacity()`
/// - `write_offset() == (read_offset() + len()) % capacity()`
#[derive(Debug, Clone)]
pub struct SampleRing {
    buffer: Vec<Sample>,
    read_pos: usize,
    write_pos: usize,
    count: usize,
}

impl SampleRing {
    /// Creates an empty ring holding up to `capacity` samples.
    pub fn try_new(capacity: usize) -> Result<Self, InitError> {
        if capacity == 0 {
            return Err(InitError::ZeroCapacity);
        }
        Ok(Self {
            buffer: try_filled(0, capacity, "sample buffer")?,
            read_pos: 0,
            write_pos: 0,
            count: 0,
        })
    }

    /// Appends a sample, or reports [`Underrun`] and drops it when full.
    #[inline]
    pub fn push(&mut self, sample: Sample) -> Result<(), Underrun> {
        if self.count >= self.buffer.len() {
            return Err(Underrun);
        }
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
        self.count += 1;
        Ok(())
    }

    /// Removes the oldest sample, or reports [`Overrun`] when empty.
    #[inline]
    pub fn pop(&mut self) -> Result<Sample, Overrun> {
        if self.count == 0 {
            return Err(Overrun);
        }
        let sample = self.buffer[self.read_pos];
        self.read_pos = (self.read_pos + 1) % self.buffer.len();
        self.count -= 1;
        Ok(sample)
    }

    /// Number of buffered, unread samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if no samples are buffered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns true if the next push would underrun.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.count == self.buffer.len()
    }

    /// Maximum number of buffered samples.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Index the next pop reads from.
    pub fn read_offset(&self) -> usize {
        self.read_pos
    }

    /// Index the next push writes to.
    pub fn write_offset(&self) -> usize {
        self.write_pos
    }

    /// Discards all buffered samples.
    pub fn clear(&mut self) {
        self.read_pos = 0;
        self.write_pos = 0;
        self.count = 0;
    }
}

impl SampleSource for SampleRing {
    #[inline]
    fn pop(&mut self) -> Result<Sample, Overrun> {
        SampleRing::pop(self)
    }
}
