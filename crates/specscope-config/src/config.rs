//! Analyzer configuration file format and operations.

use serde::{Deserialize, Serialize};
use specscope_core::{Color, DEFAULT_CAPACITY, SpectrumColors, WaveformColors};
use std::path::Path;

use crate::error::{ConfigError, ConfigOrigin};
use crate::validation::{ValidationError, validate_config};

/// Complete analyzer configuration: transform shape, ring sizing, worker
/// timing, the drawing surface and both optional views.
///
/// Every field has a default, so a partial file only overrides what it names.
/// A view table that is absent from the file leaves that view unconfigured.
///
/// # TOML Format
///
/// ```toml
/// window_size = 256
/// bars = 32
/// capacity = 2048
/// wake_timeout_ms = 100
///
/// [surface]
/// width = 320
/// height = 240
///
/// [waveform]
/// x = 32
/// y = 4
/// height = 100
/// fg = 0x00FF00
/// mid = 0x404040
/// bg = 0x000000
///
/// [spectrum]
/// x = 0
/// y = 110
/// width = 320
/// height = 130
/// fg = 0xFFFF00
/// bg = 0x000000
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Samples per transform window, also the waveform width in pixels.
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Number of spectrum bars.
    #[serde(default = "default_bars")]
    pub bars: usize,

    /// Sample ring capacity.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Worker wait bound between shutdown checks, in milliseconds.
    #[serde(default = "default_wake_timeout_ms")]
    pub wake_timeout_ms: u64,

    /// Drawing surface.
    #[serde(default)]
    pub surface: SurfaceConfig,

    /// Oscilloscope view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waveform: Option<WaveformConfig>,

    /// Bar view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spectrum: Option<SpectrumConfig>,
}

fn default_window_size() -> usize {
    256
}

fn default_bars() -> usize {
    32
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_wake_timeout_ms() -> u64 {
    100
}

impl Default for AnalyzerConfig {
    /// The 320x240 landscape layout with both views configured.
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            bars: default_bars(),
            capacity: default_capacity(),
            wake_timeout_ms: default_wake_timeout_ms(),
            surface: SurfaceConfig::default(),
            waveform: Some(WaveformConfig::default()),
            spectrum: Some(SpectrumConfig::default()),
        }
    }
}

impl AnalyzerConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;
        Self::parse(&content, ConfigOrigin::File(path.to_path_buf()))
    }

    /// Load a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Self::parse(toml_str, ConfigOrigin::Inline)
    }

    pub(crate) fn parse(toml_str: &str, origin: ConfigOrigin) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|source| ConfigError::Parse { origin, source })
    }

    /// Save the configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::write(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write(path, e))?;
        Ok(())
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks sizes, view geometry and that both views fit on the surface.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_config(self)
    }

    /// Validates, reporting failures against `origin`.
    pub fn validated(self, origin: ConfigOrigin) -> Result<Self, ConfigError> {
        match self.validate() {
            Ok(()) => Ok(self),
            Err(source) => Err(ConfigError::Invalid { origin, source }),
        }
    }

    /// Worker wait bound as a `Duration`.
    pub fn wake_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.wake_timeout_ms)
    }
}

/// Size and fill color of the drawing surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Color the surface starts out with.
    pub background: Color,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            background: 0x000000,
        }
    }
}

/// Placement and colors of the waveform view.
///
/// The view is `window_size` pixels wide, one column per sample.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WaveformConfig {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Height in pixels.
    pub height: i32,
    /// Trace color.
    pub fg: Color,
    /// Midline color.
    pub mid: Color,
    /// Background.
    pub bg: Color,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            x: 32,
            y: 4,
            height: 100,
            fg: 0x00FF00,
            mid: 0x404040,
            bg: 0x000000,
        }
    }
}

impl WaveformConfig {
    /// Colors in the form the renderer takes.
    pub fn colors(&self) -> WaveformColors {
        WaveformColors {
            fg: self.fg,
            mid: self.mid,
            bg: self.bg,
        }
    }
}

/// Placement and colors of the spectrum view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SpectrumConfig {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// Bar color.
    pub fg: Color,
    /// Background.
    pub bg: Color,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            x: 0,
            y: 110,
            width: 320,
            height: 130,
            fg: 0xFFFF00,
            bg: 0x000000,
        }
    }
}

impl SpectrumConfig {
    /// Colors in the form the renderer takes.
    pub fn colors(&self) -> SpectrumColors {
        SpectrumColors {
            fg: self.fg,
            bg: self.bg,
        }
    }
}
