//! Configuration validation.
//!
//! A configuration that parses can still describe an analyzer that cannot be
//! built: a zero-sized window, a ring smaller than one window, a view too small
//! for its geometry maps, or a view hanging off the edge of the surface. The
//! checks here build the same layouts the analyzer will build, so anything that
//! passes also configures cleanly at runtime.
//!
//! # Example
//!
//! ```rust
//! use specscope_config::{AnalyzerConfig, ValidationError};
//!
//! let mut config = AnalyzerConfig::default();
//! assert!(config.validate().is_ok());
//!
//! config.capacity = 64;
//! assert!(matches!(
//!     config.validate(),
//!     Err(ValidationError::CapacityTooSmall { .. })
//! ));
//! ```

use specscope_core::{SpectrumLayout, WaveMap};
use thiserror::Error;

use crate::config::AnalyzerConfig;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Transform window of zero samples.
    #[error("window size must be at least 1")]
    ZeroWindow,

    /// No spectrum bars.
    #[error("bar count must be at least 1")]
    ZeroBars,

    /// Ring cannot hold a whole window.
    #[error("ring capacity {capacity} is smaller than the window size {window_size}")]
    CapacityTooSmall {
        /// Configured ring capacity.
        capacity: usize,
        /// Configured window size.
        window_size: usize,
    },

    /// Worker would spin without waiting.
    #[error("wake timeout must be at least 1 ms")]
    ZeroTimeout,

    /// Surface with no pixels.
    #[error("surface {width}x{height} has no pixels")]
    EmptySurface {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },

    /// View geometry the renderer rejects.
    #[error("{view} view: {reason}")]
    Geometry {
        /// `"waveform"` or `"spectrum"`.
        view: &'static str,
        /// Why the geometry was rejected.
        reason: String,
    },

    /// View extends past the surface.
    #[error(
        "{view} view at ({x}, {y}) size {width}x{height} does not fit a {surface_width}x{surface_height} surface"
    )]
    OutOfBounds {
        /// `"waveform"` or `"spectrum"`.
        view: &'static str,
        /// View left edge.
        x: i64,
        /// View top edge.
        y: i64,
        /// View width.
        width: i64,
        /// View height.
        height: i64,
        /// Surface width.
        surface_width: u32,
        /// Surface height.
        surface_height: u32,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Runs every check and reports all failures.
///
/// View checks are skipped when the sizes they depend on are already invalid.
pub fn validate_config(config: &AnalyzerConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if config.window_size == 0 {
        errors.push(ValidationError::ZeroWindow);
    }
    if config.bars == 0 {
        errors.push(ValidationError::ZeroBars);
    }
    if config.capacity < config.window_size {
        errors.push(ValidationError::CapacityTooSmall {
            capacity: config.capacity,
            window_size: config.window_size,
        });
    }
    if config.wake_timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let surface = config.surface;
    if surface.width == 0 || surface.height == 0 {
        errors.push(ValidationError::EmptySurface {
            width: surface.width,
            height: surface.height,
        });
    }

    if let Some(wave) = &config.waveform
        && config.window_size > 0
    {
        if let Err(e) = WaveMap::new(wave.y, wave.height) {
            errors.push(ValidationError::Geometry {
                view: "waveform",
                reason: e.to_string(),
            });
        }
        let width = i64::try_from(config.window_size).unwrap_or(i64::MAX);
        errors.extend(check_bounds(
            "waveform",
            wave.x.into(),
            wave.y.into(),
            width,
            wave.height.into(),
            config,
        ));
    }

    if let Some(spec) = &config.spectrum
        && config.bars > 0
    {
        if let Err(e) = SpectrumLayout::new(
            spec.x,
            spec.y,
            spec.width,
            spec.height,
            config.bars,
            spec.colors(),
        ) {
            errors.push(ValidationError::Geometry {
                view: "spectrum",
                reason: e.to_string(),
            });
        }
        errors.extend(check_bounds(
            "spectrum",
            spec.x.into(),
            spec.y.into(),
            spec.width.into(),
            spec.height.into(),
            config,
        ));
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

fn check_bounds(
    view: &'static str,
    x: i64,
    y: i64,
    width: i64,
    height: i64,
    config: &AnalyzerConfig,
) -> Option<ValidationError> {
    let surface = config.surface;
    let fits = x >= 0
        && y >= 0
        && x.saturating_add(width) <= i64::from(surface.width)
        && y.saturating_add(height) <= i64::from(surface.height);
    (!fits).then_some(ValidationError::OutOfBounds {
        view,
        x,
        y,
        width,
        height,
        surface_width: surface.width,
        surface_height: surface.height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SpectrumConfig, SurfaceConfig, WaveformConfig};

    #[test]
    fn zero_sizes_are_reported_together() {
        let config = AnalyzerConfig {
            window_size: 0,
            bars: 0,
            ..AnalyzerConfig::default()
        };
        match validate_config(&config) {
            Err(ValidationError::Multiple(errors)) => {
                assert!(errors.contains(&ValidationError::ZeroWindow));
                assert!(errors.contains(&ValidationError::ZeroBars));
            }
            other => panic!("expected multiple errors, got {other:?}"),
        }
    }

    #[test]
    fn capacity_below_window() {
        let config = AnalyzerConfig {
            capacity: 100,
            waveform: None,
            ..AnalyzerConfig::default()
        };
        assert_eq!(
            validate_config(&config),
            Err(ValidationError::CapacityTooSmall {
                capacity: 100,
                window_size: 256,
            })
        );
    }

    #[test]
    fn zero_timeout() {
        let config = AnalyzerConfig {
            wake_timeout_ms: 0,
            ..AnalyzerConfig::default()
        };
        assert_eq!(validate_config(&config), Err(ValidationError::ZeroTimeout));
    }

    #[test]
    fn flat_waveform_is_degenerate() {
        let config = AnalyzerConfig {
            waveform: Some(WaveformConfig {
                height: 1,
                ..WaveformConfig::default()
            }),
            ..AnalyzerConfig::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(
            matches!(err, ValidationError::Geometry { view: "waveform", .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn towering_waveform_is_rejected_without_overflow() {
        let config = AnalyzerConfig {
            waveform: Some(WaveformConfig {
                height: 100_000_000,
                ..WaveformConfig::default()
            }),
            ..AnalyzerConfig::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::OutOfBounds { view: "waveform", .. })
        ));
    }

    #[test]
    fn waveform_past_the_coordinate_range_is_degenerate() {
        let config = AnalyzerConfig {
            waveform: Some(WaveformConfig {
                y: i32::MAX - 10,
                height: 64,
                ..WaveformConfig::default()
            }),
            spectrum: None,
            ..AnalyzerConfig::default()
        };
        let err = validate_config(&config).unwrap_err();
        let ValidationError::Multiple(errors) = err else {
            panic!("expected geometry and bounds errors, got {err:?}");
        };
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::Geometry { view: "waveform", reason } if reason.contains("coordinate range")
        )));
    }

    #[test]
    fn narrow_spectrum_is_degenerate() {
        let config = AnalyzerConfig {
            spectrum: Some(SpectrumConfig {
                width: 40,
                ..SpectrumConfig::default()
            }),
            ..AnalyzerConfig::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(
            matches!(err, ValidationError::Geometry { view: "spectrum", .. }),
            "got {err:?}"
        );
        assert!(err.to_string().contains("cannot hold 32 bars"));
    }

    #[test]
    fn waveform_wider_than_surface() {
        let config = AnalyzerConfig {
            surface: SurfaceConfig {
                width: 200,
                ..SurfaceConfig::default()
            },
            spectrum: None,
            ..AnalyzerConfig::default()
        };
        assert_eq!(
            validate_config(&config),
            Err(ValidationError::OutOfBounds {
                view: "waveform",
                x: 32,
                y: 4,
                width: 256,
                height: 100,
                surface_width: 200,
                surface_height: 240,
            })
        );
    }

    #[test]
    fn negative_origin_is_out_of_bounds() {
        let config = AnalyzerConfig {
            spectrum: Some(SpectrumConfig {
                x: -1,
                ..SpectrumConfig::default()
            }),
            waveform: None,
            ..AnalyzerConfig::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::OutOfBounds { view: "spectrum", .. })
        ));
    }

    #[test]
    fn empty_surface() {
        let config = AnalyzerConfig {
            surface: SurfaceConfig {
                width: 0,
                height: 0,
                background: 0,
            },
            waveform: None,
            spectrum: None,
            ..AnalyzerConfig::default()
        };
        assert_eq!(
            validate_config(&config),
            Err(ValidationError::EmptySurface { width: 0, height: 0 })
        );
    }

    #[test]
    fn no_views_is_valid() {
        let config = AnalyzerConfig {
            waveform: None,
            spectrum: None,
            ..AnalyzerConfig::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn multiple_display_joins_messages() {
        let err = ValidationError::Multiple(vec![
            ValidationError::ZeroWindow,
            ValidationError::ZeroTimeout,
        ]);
        assert_eq!(
            err.to_string(),
            "multiple validation errors: window size must be at least 1; wake timeout must be at least 1 ms"
        );
    }
}
