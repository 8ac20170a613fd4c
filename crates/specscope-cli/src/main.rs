//! specscope CLI - render test tones and WAV files through the spectrum analyzer.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "specscope")]
#[command(author, version, about = "Real-time audio spectrum visualizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a synthetic test tone through the analyzer
    Tone(commands::tone::ToneArgs),

    /// Stream a WAV file through the analyzer
    File(commands::file::FileArgs),

    /// Inspect the correlation table
    Table(commands::table::TableArgs),

    /// Show and manage configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for charts and JSON.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    tracing_log::LogTracer::init().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tone(args) => commands::tone::run(args),
        Commands::File(args) => commands::file::run(args),
        Commands::Table(args) => commands::table::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
