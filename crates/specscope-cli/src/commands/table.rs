//! Correlation table inspection command.

use clap::Args;
use specscope_core::correlation::analysis_cycles;
use specscope_core::{Coefficient, CorrelationTable, GAIN};

#[derive(Args)]
pub struct TableArgs {
    /// Samples per window
    #[arg(short, long, default_value = "256")]
    window_size: usize,

    /// Number of bars
    #[arg(short, long, default_value = "32")]
    bars: usize,

    /// Print every coefficient of this bar's row
    #[arg(short, long)]
    row: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: TableArgs) -> anyhow::Result<()> {
    let table = CorrelationTable::try_new(args.window_size, args.bars)?;

    if let Some(k) = args.row
        && k >= table.bars()
    {
        anyhow::bail!("--row {k} is out of range (0..{})", table.bars());
    }

    if args.json {
        let rows: Vec<usize> = match args.row {
            Some(k) => vec![k],
            None => (0..table.bars()).collect(),
        };
        let rows: Vec<_> = rows
            .into_iter()
            .map(|k| {
                serde_json::json!({
                    "bar": k,
                    "cycles": analysis_cycles(k),
                    "coefficients": table
                        .row(k)
                        .iter()
                        .map(|c| serde_json::json!({ "sin": c.sin, "cos": c.cos }))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();
        let report = serde_json::json!({
            "window_size": table.window_size(),
            "bars": table.bars(),
            "gain": GAIN,
            "max_abs": table.max_abs(),
            "rows": rows,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Correlation table: {} samples x {} bars (gain {GAIN})",
        table.window_size(),
        table.bars()
    );
    println!("  max |coefficient|: {}", table.max_abs());
    println!();

    match args.row {
        Some(k) => print_row(&table, k),
        None => print_summary(&table),
    }
    Ok(())
}

fn print_summary(table: &CorrelationTable) {
    println!("  {:>4}  {:>6}  {:>8}  {:>8}", "bar", "cycles", "peak sin", "peak cos");
    println!("  {}", "-".repeat(32));
    for k in 0..table.bars() {
        let row = table.row(k);
        println!(
            "  {k:>4}  {:>6}  {:>8}  {:>8}",
            analysis_cycles(k),
            peak(row, |c| c.sin),
            peak(row, |c| c.cos)
        );
    }
}

fn print_row(table: &CorrelationTable, k: usize) {
    println!("Bar {k} ({} cycles per window)", analysis_cycles(k));
    println!("  {:>5}  {:>5}  {:>5}", "n", "sin", "cos");
    for (n, c) in table.row(k).iter().enumerate() {
        println!("  {n:>5}  {:>5}  {:>5}", c.sin, c.cos);
    }
}

fn peak(row: &[Coefficient], part: impl Fn(&Coefficient) -> i8) -> u8 {
    row.iter().map(|c| part(c).unsigned_abs()).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_of_row() {
        let row = [
            Coefficient { sin: 3, cos: -9 },
            Coefficient { sin: -7, cos: 2 },
        ];
        assert_eq!(peak(&row, |c| c.sin), 7);
        assert_eq!(peak(&row, |c| c.cos), 9);
        assert_eq!(peak(&[], |c| c.sin), 0);
    }
}
