//! Configuration management commands.

use super::common::LayoutArgs;
use clap::{Args, Subcommand};
use specscope_config::{
    AnalyzerConfig, default_config_path, ensure_user_config_dir, layouts, require_layout,
    user_config_dir,
};
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show {
        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Write a configuration file (defaults to the user config path)
    Init {
        /// Start from this built-in layout
        #[arg(short, long)]
        layout: Option<String>,

        /// Destination file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show configuration paths
    Path,

    /// List built-in layouts
    Layouts,
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show { layout } => show_config(&layout),
        ConfigCommand::Init {
            layout,
            output,
            force,
        } => init_config(layout.as_deref(), output, force),
        ConfigCommand::Path => show_paths(),
        ConfigCommand::Layouts => list_layouts(),
    }
}

fn show_config(layout: &LayoutArgs) -> anyhow::Result<()> {
    let config = layout.load()?;
    print!("{}", config.to_toml()?);
    if let Err(e) = config.validate() {
        eprintln!("warning: {e}");
    }
    Ok(())
}

fn init_config(layout: Option<&str>, output: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let config = match layout {
        Some(name) => require_layout(name)?,
        None => AnalyzerConfig::default(),
    };
    let path = match output {
        Some(path) => path,
        None => {
            ensure_user_config_dir()?;
            default_config_path()
        }
    };

    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }

    config.save(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn show_paths() -> anyhow::Result<()> {
    let default = default_config_path();
    println!("Config directory: {}", user_config_dir().display());
    println!(
        "Default config:   {} ({})",
        default.display(),
        if default.is_file() { "present" } else { "not created" }
    );
    Ok(())
}

fn list_layouts() -> anyhow::Result<()> {
    println!("Built-in Layouts:");
    println!("=================");
    for (name, config) in layouts() {
        println!(
            "  {:18} - {}x{} surface, {}-sample window, {} bars",
            name, config.surface.width, config.surface.height, config.window_size, config.bars
        );
    }
    Ok(())
}
