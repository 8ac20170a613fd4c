//! Built-in screen layouts.
//!
//! Each layout is a complete [`AnalyzerConfig`] for a common display size,
//! embedded as TOML so it reads exactly like a user file.

use crate::AnalyzerConfig;
use crate::error::{ConfigError, ConfigOrigin};

/// Names of the built-in layouts.
pub static LAYOUT_NAMES: &[&str] = &["tft-320x240", "compact-160x128"];

static LAYOUTS_TOML: &[(&str, &str)] = &[
    ("tft-320x240", TFT_320X240),
    ("compact-160x128", COMPACT_160X128),
];

/// 2.8" landscape TFT: 256-sample trace on top, 32 bars below.
const TFT_320X240: &str = r#"
window_size = 256
bars = 32
capacity = 2048
wake_timeout_ms = 100

[surface]
width = 320
height = 240
background = 0x000000

[waveform]
x = 32
y = 4
height = 100
fg = 0x00FF00
mid = 0x404040
bg = 0x000000

[spectrum]
x = 0
y = 110
width = 320
height = 130
fg = 0xFFFF00
bg = 0x000000
"#;

/// Small 160x128 panel: 128-sample trace, 16 bars.
const COMPACT_160X128: &str = r#"
window_size = 128
bars = 16
capacity = 1024
wake_timeout_ms = 100

[surface]
width = 160
height = 128
background = 0x000000

[waveform]
x = 16
y = 2
height = 56
fg = 0x00FFFF
mid = 0x303030
bg = 0x000000

[spectrum]
x = 0
y = 62
width = 160
height = 66
fg = 0xFF8000
bg = 0x000000
"#;

/// All built-in layouts with their names.
pub fn layouts() -> Vec<(&'static str, AnalyzerConfig)> {
    LAYOUTS_TOML
        .iter()
        .filter_map(|(name, toml)| AnalyzerConfig::from_toml(toml).ok().map(|c| (*name, c)))
        .collect()
}

/// Get a built-in layout by name (case-insensitive).
pub fn get_layout(name: &str) -> Option<AnalyzerConfig> {
    LAYOUTS_TOML
        .iter()
        .find(|(layout, _)| layout.eq_ignore_ascii_case(name))
        .and_then(|(_, toml)| AnalyzerConfig::from_toml(toml).ok())
}

/// Like [`get_layout`], but reports an unknown name as an error.
pub fn require_layout(name: &str) -> Result<AnalyzerConfig, ConfigError> {
    let (layout, toml) = LAYOUTS_TOML
        .iter()
        .find(|(layout, _)| layout.eq_ignore_ascii_case(name))
        .ok_or_else(|| ConfigError::UnknownLayout {
            name: name.to_string(),
        })?;
    AnalyzerConfig::parse(toml, ConfigOrigin::Layout((*layout).to_string()))
}

/// Returns true if `name` is a built-in layout.
pub fn is_layout(name: &str) -> bool {
    LAYOUT_NAMES.iter().any(|n| n.eq_ignore_ascii_case(name))
}
