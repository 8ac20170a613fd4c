//! Configuration for the specscope analyzer.
//!
//! TOML files describing the transform shape, ring sizing, worker timing, the
//! drawing surface and the placement and colors of both views.
//!
//! # Features
//!
//! - **Config files**: load and save [`AnalyzerConfig`] as TOML
//! - **Validation**: catch sizes and view geometry the analyzer would reject
//! - **Layouts**: built-in configurations for common screen sizes
//! - **Paths**: platform-specific config directory
//!
//! # Example
//!
//! ```rust,no_run
//! use specscope_config::{AnalyzerConfig, default_config_path, get_layout};
//!
//! let mut config = get_layout("compact-160x128").unwrap();
//! config.bars = 8;
//! config.validate().unwrap();
//! config.save(default_config_path()).unwrap();
//!
//! let loaded = AnalyzerConfig::load(default_config_path()).unwrap();
//! assert_eq!(loaded.bars, 8);
//! ```

mod config;
mod error;

/// Platform-specific configuration paths.
pub mod paths;

/// Configuration validation.
pub mod validation;

/// Built-in screen layouts.
pub mod layouts;

pub use config::{AnalyzerConfig, SpectrumConfig, SurfaceConfig, WaveformConfig};
pub use error::{ConfigError, ConfigOrigin};
pub use layouts::{LAYOUT_NAMES, get_layout, is_layout, layouts, require_layout};
pub use paths::{default_config_path, ensure_user_config_dir, find_config, user_config_dir};
pub use validation::{ValidationError, ValidationResult, validate_config};
