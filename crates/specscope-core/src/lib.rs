//! Specscope Core - windowed spectrum engine and diff renderers
//!
//! This crate provides the real-time half of the specscope visualizer: it turns
//! a stream of signed 8-bit samples into per-bar magnitudes and draws two
//! synchronized views (waveform trace and bar spectrum) onto any pixel surface,
//! touching only the pixels that changed since the previous window.
//!
//! # Core Abstractions
//!
//! ## Sample Path
//!
//! - [`SampleRing`] - Fixed-capacity FIFO of [`Sample`]s with underrun/overrun reporting
//! - [`SampleSource`] - Trait the transform engine reads samples through
//!
//! ## Transform
//!
//! - [`CorrelationTable`] - Precomputed windowed quadrature coefficients, one row per bar
//! - [`TransformEngine`] - Consumes one window and produces one magnitude per bar
//! - [`WindowSink`] - Receives raw samples and bar magnitudes as a window is processed
//!
//! ## Rendering
//!
//! - [`PixelSurface`] - The two drawing operations the renderers need
//! - [`WaveMap`], [`SpecMap`], [`BarLayout`] - Precomputed screen geometry
//! - [`WaveformRenderer`], [`SpectrumRenderer`] - Diff-based drawers with per-column/per-bar state
//! - [`Display`] - A surface plus both renderers, usable as a [`WindowSink`]
//! - [`Framebuffer`] - In-memory surface for offline rendering and tests
//!
//! # Data Flow
//!
//! ```text
//! producer ──► SampleRing ──► TransformEngine ──► WindowSink (Display)
//!                                  │                  ├─ WaveformRenderer (raw samples)
//!                                  │                  └─ SpectrumRenderer (magnitudes)
//!                            CorrelationTable
//! ```
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc`). Disable the default
//! `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! specscope-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use specscope_core::{
//!     Display, Framebuffer, SampleRing, SpectrumColors, TransformEngine, test_tone,
//!     divisor_for_bar,
//! };
//!
//! let mut ring = SampleRing::try_new(2048).unwrap();
//! let mut engine = TransformEngine::try_new(64, 8).unwrap();
//! let mut display = Display::try_new(Framebuffer::new(96, 80), 64, 8).unwrap();
//! display
//!     .configure_spectrum(0, 8, 81, 64, SpectrumColors { fg: 0xFFFFFF, bg: 0 })
//!     .unwrap();
//!
//! for sample in test_tone(64, divisor_for_bar(2)) {
//!     ring.push(sample).unwrap();
//! }
//! let magnitudes = engine.process_window(&mut ring, &mut display).unwrap();
//! let loudest = (0..8).max_by_key(|&k| magnitudes[k]).unwrap();
//! assert_eq!(loudest, 2);
//! ```
//!
//! # Design Principles
//!
//! - **Fixed-point hot path**: integer accumulation only, float math happens at construction
//! - **Allocate up front**: buffers and state arrays are sized once; only geometry maps are rebuilt
//! - **Incremental drawing**: O(1) pixel work per unchanged sample or bar

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod correlation;
pub mod error;
pub mod geometry;
pub mod render;
pub mod ring;
pub mod surface;
pub mod tone;
pub mod transform;

/// A signed 8-bit audio sample, range [-128, 127].
pub type Sample = i8;

/// A color value passed through to the pixel surface unchanged.
///
/// The meaning of the bits belongs to the surface: RGB565 on a TFT panel,
/// `0xRRGGBB` on a [`Framebuffer`].
pub type Color = u32;

/// Ring capacity used when none is given explicitly.
pub const DEFAULT_CAPACITY: usize = 2048;

// Re-export main types at crate root
pub use correlation::{Coefficient, CorrelationTable, GAIN};
pub use error::{GeometryError, InitError};
pub use geometry::{BarLayout, SpecMap, WaveMap};
pub use render::{
    Display, SpectrumColors, SpectrumLayout, SpectrumRenderer, WaveformColors, WaveformLayout,
    WaveformRenderer,
};
pub use ring::{Overrun, SampleRing, SampleSource, Underrun};
pub use surface::{CountingSurface, DrawCounts, Framebuffer, PixelSurface};
pub use tone::{divisor_for_bar, test_tone};
pub use transform::{TransformEngine, WindowSink};
