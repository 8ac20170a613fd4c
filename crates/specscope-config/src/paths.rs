//! Platform-specific configuration paths.
//!
//! - **User config dir**: `~/.config/specscope/` (Linux),
//!   `~/Library/Application Support/specscope/` (macOS), `%APPDATA%\specscope\` (Windows)
//! - **Default config file**: `specscope.toml` inside the user config dir
//!
//! # Example
//!
//! ```rust,no_run
//! use specscope_config::paths;
//!
//! println!("Config: {:?}", paths::default_config_path());
//!
//! if let Some(path) = paths::find_config("bench_rig") {
//!     println!("Found config at: {:?}", path);
//! }
//! ```

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "specscope";

/// File name of the default configuration.
pub const CONFIG_FILE_NAME: &str = "specscope.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Path of the configuration file used when none is given.
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE_NAME)
}

/// Find a configuration file by name.
///
/// `name` may be a path to an existing file, or a bare name (with or without
/// `.toml`) looked up in the user config dir.
pub fn find_config(name: &str) -> Option<PathBuf> {
    find_config_in(name, &user_config_dir())
}

fn find_config_in(name: &str, dir: &Path) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };

    let candidate = dir.join(filename);
    candidate.is_file().then_some(candidate)
}

/// Ensure the user config directory exists.
///
/// Creates the directory and any parent directories if they don't exist.
pub fn ensure_user_config_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_config_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::write(&dir, e))?;
    }

    Ok(dir)
}
