//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use clap::Args;
use specscope_config::{
    AnalyzerConfig, ConfigOrigin, default_config_path, find_config, require_layout,
};
use specscope_core::Framebuffer;
use specscope_io::{Analyzer, AnalyzerOptions, DiagnosticsSnapshot};
use std::time::Duration;

/// How long a command waits for the worker to drain before giving up.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the analyzer configuration comes from, plus per-run overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct LayoutArgs {
    /// Configuration file (path, or name in the user config dir)
    #[arg(short, long, conflicts_with = "layout")]
    pub config: Option<String>,

    /// Built-in layout (see `specscope config layouts`)
    #[arg(short, long)]
    pub layout: Option<String>,

    /// Override samples per window
    #[arg(long)]
    pub window_size: Option<usize>,

    /// Override the number of bars
    #[arg(long)]
    pub bars: Option<usize>,
}

impl LayoutArgs {
    /// Effective configuration with overrides applied, not yet validated.
    ///
    /// Precedence: `--layout`, then `--config`, then the default config file
    /// if it exists, then built-in defaults.
    pub fn load(&self) -> anyhow::Result<AnalyzerConfig> {
        Ok(self.load_with_origin()?.0)
    }

    /// Like [`load`](Self::load), then validated.
    pub fn resolve(&self) -> anyhow::Result<AnalyzerConfig> {
        let (config, origin) = self.load_with_origin()?;
        Ok(config.validated(origin)?)
    }

    fn load_with_origin(&self) -> anyhow::Result<(AnalyzerConfig, ConfigOrigin)> {
        let (mut config, origin) = self.base()?;
        if let Some(window_size) = self.window_size {
            config.window_size = window_size;
        }
        if let Some(bars) = self.bars {
            config.bars = bars;
        }
        Ok((config, origin))
    }

    fn base(&self) -> anyhow::Result<(AnalyzerConfig, ConfigOrigin)> {
        if let Some(name) = &self.layout {
            return Ok((require_layout(name)?, ConfigOrigin::Layout(name.clone())));
        }
        if let Some(name) = &self.config {
            let path = find_config(name).with_context(|| format!("config not found: {name}"))?;
            tracing::debug!(path = %path.display(), "loading config");
            return Ok((AnalyzerConfig::load(&path)?, ConfigOrigin::File(path)));
        }
        let path = default_config_path();
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading user config");
            return Ok((AnalyzerConfig::load(&path)?, ConfigOrigin::File(path)));
        }
        Ok((AnalyzerConfig::default(), ConfigOrigin::Defaults))
    }
}

/// Starts an analyzer on an in-memory framebuffer with both configured views
/// installed and cleared.
pub fn start_analyzer(config: &AnalyzerConfig) -> anyhow::Result<Analyzer<Framebuffer>> {
    let mut surface = Framebuffer::new(
        config.surface.width as usize,
        config.surface.height as usize,
    );
    surface.fill(config.surface.background);

    let options = AnalyzerOptions {
        window_size: config.window_size,
        bars: config.bars,
        capacity: config.capacity,
        wake_timeout: config.wake_timeout(),
    };
    let analyzer = Analyzer::with_options(surface, options)?;

    if let Some(wave) = &config.waveform {
        analyzer.configure_waveform(wave.x, wave.y, wave.height, wave.colors())?;
        analyzer.clear_waveform();
    }
    if let Some(spec) = &config.spectrum {
        analyzer.configure_spectrum(spec.x, spec.y, spec.width, spec.height, spec.colors())?;
        analyzer.clear_spectrum();
    }
    Ok(analyzer)
}

/// Index of the largest magnitude (lowest index on ties).
pub fn loudest(magnitudes: &[u32]) -> Option<usize> {
    magnitudes
        .iter()
        .enumerate()
        .max_by(|(i, a), (j, b)| a.cmp(b).then(j.cmp(i)))
        .map(|(k, _)| k)
}

/// Horizontal text bar chart, one line per bar, scaled to the largest value.
pub fn bar_chart(magnitudes: &[u32], width: usize) -> String {
    let max = magnitudes.iter().copied().max().unwrap_or(0);
    let mut out = String::new();
    for (k, &m) in magnitudes.iter().enumerate() {
        let len = if max == 0 {
            0
        } else {
            (u64::from(m) * width as u64 / u64::from(max)) as usize
        };
        out.push_str(&format!(
            "  {k:3} |{}{}| {m}\n",
            "#".repeat(len),
            " ".repeat(width - len)
        ));
    }
    out
}

/// Prints runtime counters the way every command reports them.
pub fn print_diagnostics(stats: &DiagnosticsSnapshot) {
    println!("Diagnostics:");
    println!("  windows:   {}", stats.windows);
    println!("  underruns: {}", stats.underruns);
    println!("  overruns:  {}", stats.overruns);
    println!("  buffered:  {}", stats.buffered);
}

/// Runtime counters as a JSON object.
pub fn diagnostics_json(stats: &DiagnosticsSnapshot) -> serde_json::Value {
    serde_json::json!({
        "windows": stats.windows,
        "underruns": stats.underruns,
        "overruns": stats.overruns,
        "buffered": stats.buffered,
    })
}
