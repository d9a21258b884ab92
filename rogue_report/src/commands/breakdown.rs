//! Per-ability DPS report

use super::{BuildArgs, OutputFormat};
use anyhow::{Context, Result};
use clap::Parser;
use rogue_core::{DamageBreakdown, JsonLinesSink};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

/// Per-ability DPS for a build
#[derive(Parser)]
pub struct Breakdown {
    #[command(flatten)]
    args: BuildArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Also append the breakdown to a JSON-lines file
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,
}

#[derive(Serialize)]
struct BreakdownReport<'a> {
    total_dps: f64,
    breakdown: &'a DamageBreakdown,
}

impl Breakdown {
    pub fn execute(self) -> Result<()> {
        let (build, calculator) = self.args.load()?;
        let mut calculator = match &self.export {
            Some(path) => {
                let file = File::options()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open export file: {}", path.display()))?;
                calculator.with_sink(Box::new(JsonLinesSink::new(BufWriter::new(file))))
            }
            None => calculator,
        };

        let stats = build.stat_snapshot()?;
        let inputs = build.cycle_inputs();
        let breakdown = calculator
            .compute_breakdown(&stats, &inputs.frequencies, &inputs.crit_rates, &inputs.procs)
            .context("Failed to compute damage breakdown")?;
        info!(total = breakdown.total(), "breakdown computed");

        match self.format {
            OutputFormat::Table => print_table(&breakdown),
            OutputFormat::Json => {
                let report = BreakdownReport {
                    total_dps: breakdown.total(),
                    breakdown: &breakdown,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Ok(())
    }
}

fn print_table(breakdown: &DamageBreakdown) {
    let total = breakdown.total();
    println!("{:<28} {:>12} {:>8}", "Source", "DPS", "Share");
    println!("{}", "-".repeat(50));
    for (name, dps) in breakdown.sorted_by_dps() {
        let share = if total > 0.0 { dps / total * 100.0 } else { 0.0 };
        println!("{:<28} {:>12.1} {:>7.1}%", name, dps, share);
    }
    println!("{}", "-".repeat(50));
    println!("{:<28} {:>12.1}", "Total", total);
}
