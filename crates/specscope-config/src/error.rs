//! Error types for configuration operations.
//!
//! Every error names the configuration it came from: a file on disk, a
//! built-in layout, inline TOML or the built-in defaults.

use crate::layouts::LAYOUT_NAMES;
use crate::validation::ValidationError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Where an analyzer configuration was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// A TOML file on disk.
    File(PathBuf),
    /// A built-in layout, by name.
    Layout(String),
    /// TOML handed over as a string.
    Inline,
    /// `AnalyzerConfig::default()`.
    Defaults,
}

impl fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "config file '{}'", path.display()),
            Self::Layout(name) => write!(f, "layout '{name}'"),
            Self::Inline => f.write_str("inline config"),
            Self::Defaults => f.write_str("default config"),
        }
    }
}

/// Errors that can occur while loading, saving or checking a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config file '{}': {source}", path.display())]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The TOML is malformed or has fields of the wrong type.
    #[error("{origin} is not a valid analyzer config: {source}")]
    Parse {
        /// Configuration that failed to parse.
        origin: ConfigOrigin,
        /// Parser error, with line and column.
        #[source]
        source: toml::de::Error,
    },

    /// The configuration parsed but the analyzer could not run with it.
    #[error("{origin} cannot drive the analyzer: {source}")]
    Invalid {
        /// Configuration that failed validation.
        origin: ConfigOrigin,
        /// First problem found.
        #[source]
        source: ValidationError,
    },

    /// A config file or its directory could not be written.
    #[error("cannot write '{}': {source}", path.display())]
    Write {
        /// File or directory that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be rendered as TOML.
    #[error("cannot render config as TOML: {0}")]
    Render(#[from] toml::ser::Error),

    /// No built-in layout has this name.
    #[error("no built-in layout named '{name}' (available: {})", LAYOUT_NAMES.join(", "))]
    UnknownLayout {
        /// Requested name.
        name: String,
    },
}

impl ConfigError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// The configuration this error is about, when it has one.
    pub fn origin(&self) -> Option<&ConfigOrigin> {
        match self {
            Self::Parse { origin, .. } | Self::Invalid { origin, .. } => Some(origin),
            _ => None,
        }
    }
}
