//! Stat weight report

use super::{BuildArgs, OutputFormat};
use anyhow::{Context, Result};
use clap::Parser;
use rogue_core::{EpEstimator, Stat};

/// Stat weights for a build
#[derive(Parser)]
pub struct Ep {
    #[command(flatten)]
    args: BuildArgs,

    /// Stats to weigh, comma separated
    #[arg(long, value_delimiter = ',', default_value = "agi,haste,crit,mastery,ap,multistrike,readiness")]
    stats: Vec<Stat>,

    /// Stat whose weight is 1.0, or "dps" for raw DPS per point
    #[arg(long, default_value = "agi")]
    normalize_to: String,

    /// Rating added per finite difference
    #[arg(long, default_value_t = 1.0)]
    step: f64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,
}

impl Ep {
    pub fn execute(self) -> Result<()> {
        let (build, mut calculator) = self.args.load()?;
        let normalize_to = match self.normalize_to.as_str() {
            "dps" => None,
            name => Some(name.parse::<Stat>()?),
        };
        let estimator = EpEstimator::new(self.stats, normalize_to, self.step)?;
        let stats = build.stat_snapshot()?;
        let cycle = build.fixed_cycle();

        let ep = estimator
            .estimate(&mut calculator, &cycle, &stats)
            .context("Failed to estimate stat weights")?;

        match self.format {
            OutputFormat::Table => {
                println!("Baseline DPS: {:.1}", ep.baseline_dps);
                println!("{:<14} {:>8} {:>12}", "Stat", "EP", "DPS/point");
                for stat in estimator.stats() {
                    let weight = ep.weight(*stat).unwrap_or(0.0);
                    let marginal = ep.marginal_dps.get(stat).copied().unwrap_or(0.0);
                    println!("{:<14} {:>8.3} {:>12.4}", stat.as_str(), weight, marginal);
                }
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ep)?),
        }
        Ok(())
    }
}
