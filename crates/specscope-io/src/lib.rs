//! Runtime layer for the specscope visualizer.
//!
//! This crate provides:
//!
//! - **Analyzer runtime**: [`Analyzer`] owns the shared sample ring, the work
//!   signal and a background worker that drains whole windows into a
//!   [`Display`](specscope_core::Display)
//! - **Producer handle**: [`SampleProducer`] feeds samples from another thread
//! - **WAV sources**: [`read_wav_i8`] and [`write_wav_i8`] for offline input
//! - **Frame export**: [`write_frame`] saves a [`Framebuffer`](specscope_core::Framebuffer)
//!   as PNG through the `image` crate
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use specscope_core::{Framebuffer, SpectrumColors, divisor_for_bar};
//! use specscope_io::{Analyzer, write_frame};
//! use std::time::Duration;
//!
//! let analyzer = Analyzer::new(Framebuffer::new(320, 240), 256, 32)?;
//! analyzer.configure_spectrum(0, 120, 320, 120, SpectrumColors { fg: 0xFFFF00, bg: 0 })?;
//! analyzer.clear_spectrum();
//!
//! analyzer.inject_test_tone(divisor_for_bar(4));
//! analyzer.wait_idle(Duration::from_secs(1));
//! analyzer.with_surface(|fb| write_frame("frame.png", fb))?;
//! # Ok::<(), specscope_io::Error>(())
//! ```

mod analyzer;
mod frame;
mod signal;
mod wav;

pub use analyzer::{Analyzer, AnalyzerOptions, DiagnosticsSnapshot, SampleProducer};
pub use frame::{frame_to_rgb, write_frame};
pub use signal::WorkSignal;
pub use wav::{WavInfo, read_wav_i8, write_wav_i8};

use specscope_core::{GeometryError, InitError};

/// Error types for the analyzer runtime and file I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Engine construction failed; no worker was started.
    #[error("initialization failed: {0}")]
    Init(#[from] InitError),

    /// A view geometry cannot be drawn.
    #[error("invalid view geometry: {0}")]
    Geometry(#[from] GeometryError),

    /// The worker thread could not be spawned.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Frame could not be encoded or saved.
    #[error("frame export error: {0}")]
    Image(#[from] image::ImageError),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for runtime and I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_error_is_wrapped() {
        let err: Error = InitError::ZeroBars.into();
        assert!(matches!(err, Error::Init(InitError::ZeroBars)));
        assert_eq!(err.to_string(), "initialization failed: bar count must be at least 1");
    }

    #[test]
    fn geometry_error_is_wrapped() {
        let err: Error = GeometryError::HeightTooSmall(1).into();
        assert!(err.to_string().starts_with("invalid view geometry"));
    }

    #[test]
    fn image_error_is_wrapped() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: Error = image::ImageError::IoError(io).into();
        assert!(matches!(err, Error::Image(_)));
        assert!(err.to_string().starts_with("frame export error"));
    }

    #[test]
    fn spawn_error_keeps_source() {
        use std::error::Error as _;
        let err = Error::Spawn(std::io::Error::other("no threads"));
        assert!(err.source().is_some());
    }
}
