//! Test tone rendering command.

use super::common::{
    IDLE_TIMEOUT, LayoutArgs, bar_chart, diagnostics_json, loudest, print_diagnostics,
    start_analyzer,
};
use clap::Args;
use specscope_core::divisor_for_bar;
use specscope_io::write_frame;
use std::path::PathBuf;

#[derive(Args)]
pub struct ToneArgs {
    #[command(flatten)]
    layout: LayoutArgs,

    /// Bar to aim the tone at (default: a quarter of the way up)
    #[arg(short, long, conflicts_with = "divisor")]
    bar: Option<usize>,

    /// Raw tone divisor; larger values give higher frequencies
    #[arg(short, long)]
    divisor: Option<f64>,

    /// Number of windows to render
    #[arg(short, long, default_value = "1")]
    frames: usize,

    /// Write the final frame as an image (PNG unless the extension is .ppm)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print results as JSON instead of a chart
    #[arg(long)]
    json: bool,
}

pub fn run(args: ToneArgs) -> anyhow::Result<()> {
    let config = args.layout.resolve()?;

    if args.frames == 0 {
        anyhow::bail!("--frames must be at least 1");
    }
    let divisor = match (args.bar, args.divisor) {
        (_, Some(divisor)) if !(divisor.is_finite() && divisor > 0.0) => {
            anyhow::bail!("--divisor must be a positive number")
        }
        (_, Some(divisor)) => divisor,
        (Some(bar), None) if bar >= config.bars => {
            anyhow::bail!("--bar {bar} is out of range (0..{})", config.bars)
        }
        (Some(bar), None) => divisor_for_bar(bar),
        (None, None) => divisor_for_bar(config.bars / 4),
    };

    let analyzer = start_analyzer(&config)?;
    for _ in 0..args.frames {
        analyzer.inject_test_tone(divisor);
        if !analyzer.wait_idle(IDLE_TIMEOUT) {
            anyhow::bail!("analyzer did not finish within {IDLE_TIMEOUT:?}");
        }
    }

    let magnitudes = analyzer.latest_magnitudes();
    let stats = analyzer.diagnostics();

    if args.json {
        let report = serde_json::json!({
            "window_size": config.window_size,
            "bars": config.bars,
            "divisor": divisor,
            "frames": args.frames,
            "loudest": loudest(&magnitudes),
            "magnitudes": magnitudes,
            "diagnostics": diagnostics_json(&stats),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Test tone: divisor {divisor:.3}, {} window(s) of {} samples, {} bars",
            args.frames, config.window_size, config.bars
        );
        println!();
        print!("{}", bar_chart(&magnitudes, 40));
        println!();
        if let Some(k) = loudest(&magnitudes) {
            println!("Loudest bar: {k}");
        }
        print_diagnostics(&stats);
    }

    if let Some(path) = &args.output {
        analyzer.with_surface(|fb| write_frame(path, fb))?;
        if !args.json {
            println!("\nWrote frame to {}", path.display());
        }
    }

    analyzer.shutdown();
    Ok(())
}
