//! WAV file streaming command.

use super::common::{
    IDLE_TIMEOUT, LayoutArgs, bar_chart, diagnostics_json, loudest, print_diagnostics,
    start_analyzer,
};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use specscope_io::{read_wav_i8, write_frame};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[derive(Args)]
pub struct FileArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    #[command(flatten)]
    layout: LayoutArgs,

    /// Feed samples at the file's sample rate instead of waiting for each window
    #[arg(long)]
    realtime: bool,

    /// Write the final frame as an image (PNG unless the extension is .ppm)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: FileArgs) -> anyhow::Result<()> {
    let config = args.layout.resolve()?;

    if !args.json {
        println!("Reading {}...", args.input.display());
    }
    let (samples, info) = read_wav_i8(&args.input)?;
    if !args.json {
        println!(
            "  {} frames, {} ch, {} Hz, {}-bit{}, {:.2}s",
            info.num_frames,
            info.channels,
            info.sample_rate,
            info.bits_per_sample,
            if info.float { " float" } else { "" },
            info.duration_secs
        );
    }
    if args.realtime && info.sample_rate == 0 {
        anyhow::bail!("cannot pace a file with a sample rate of 0");
    }

    let analyzer = start_analyzer(&config)?;

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let pb = if args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(samples.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let chunk_time = if args.realtime {
        Duration::from_secs_f64(config.window_size as f64 / f64::from(info.sample_rate))
    } else {
        Duration::ZERO
    };

    let mut dropped = 0usize;
    for chunk in samples.chunks(config.window_size) {
        if !running.load(Ordering::SeqCst) {
            pb.abandon_with_message("interrupted");
            break;
        }
        dropped += chunk.len() - analyzer.add_samples(chunk);
        analyzer.trigger_processing();

        if args.realtime {
            std::thread::sleep(chunk_time);
        } else if !analyzer.wait_idle(IDLE_TIMEOUT) {
            anyhow::bail!("analyzer did not finish within {IDLE_TIMEOUT:?}");
        }
        pb.inc(chunk.len() as u64);
    }
    if !analyzer.wait_idle(IDLE_TIMEOUT) {
        anyhow::bail!("analyzer did not finish within {IDLE_TIMEOUT:?}");
    }
    pb.finish_and_clear();

    let magnitudes = analyzer.latest_magnitudes();
    let stats = analyzer.diagnostics();
    tracing::debug!(dropped, "file streamed");

    if args.json {
        let report = serde_json::json!({
            "input": args.input.to_string_lossy(),
            "sample_rate": info.sample_rate,
            "samples": samples.len(),
            "window_size": config.window_size,
            "bars": config.bars,
            "loudest": loudest(&magnitudes),
            "magnitudes": magnitudes,
            "diagnostics": diagnostics_json(&stats),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("\nFinal window:");
        print!("{}", bar_chart(&magnitudes, 40));
        println!();
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
