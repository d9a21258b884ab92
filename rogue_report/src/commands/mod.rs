//! Report subcommands

mod breakdown;
mod ep;
mod talents;

pub use breakdown::Breakdown;
pub use ep::Ep;
pub use talents::Talents;

use anyhow::{Context, Result};
use clap::Args;
use rogue_core::config::load_constants;
use rogue_core::{BuildConfig, GameConstants, RogueCalculator};
use std::path::PathBuf;
use tracing::info;

/// Build file plus optional overrides, shared by every subcommand
#[derive(Args)]
pub struct BuildArgs {
    /// Build file (TOML)
    #[arg(value_name = "BUILD")]
    build: PathBuf,

    /// Model constants file; built-in values when omitted
    #[arg(short, long, value_name = "FILE")]
    constants: Option<PathBuf>,

    /// Override the build's level
    #[arg(short, long)]
    level: Option<u32>,

    /// Report main-hand and off-hand damage as separate entries
    #[arg(long)]
    split: bool,
}

impl BuildArgs {
    pub fn load(&self) -> Result<(BuildConfig, RogueCalculator)> {
        let mut build = BuildConfig::load(&self.build)
            .with_context(|| format!("Failed to load build: {}", self.build.display()))?;
        if let Some(level) = self.level {
            build.level = level;
        }
        if self.split {
            build.settings.merge_damage = false;
        }

        let constants = match &self.constants {
            Some(path) => load_constants(path)
                .with_context(|| format!("Failed to load constants: {}", path.display()))?,
            None => GameConstants::default(),
        };

        let calculator = build
            .calculator(constants)
            .context("Failed to assemble calculator")?;
        info!(
            build = %self.build.display(),
            spec = %build.settings.spec,
            level = build.level,
            talents = %calculator.talents().encode(),
            "loaded build"
        );
        Ok((build, calculator))
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table
    Table,
    /// JSON object
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHIPPED_BUILDS: &[&str] = &[
        include_str!("../../builds/subtlety_100.toml"),
        include_str!("../../builds/assassination_90.toml"),
    ];

    #[test]
    fn test_shipped_builds_compute() {
        for content in SHIPPED_BUILDS {
            let build = BuildConfig::parse(content).unwrap();
            let mut calc = build.calculator(GameConstants::default()).unwrap();
            let stats = build.stat_snapshot().unwrap();
            let inputs = build.cycle_inputs();
            let breakdown = calc
                .compute_breakdown(&stats, &inputs.frequencies, &inputs.crit_rates, &inputs.procs)
                .unwrap();
            assert!(breakdown.total() > 0.0);
            assert!(breakdown.iter().all(|(_, dps)| dps >= 0.0));
        }
    }

    #[test]
    fn test_split_build_reports_both_hands() {
        let build = BuildConfig::parse(SHIPPED_BUILDS[1]).unwrap();
        assert!(!build.settings.merge_damage);
        let mut calc = build.calculator(GameConstants::default()).unwrap();
        let inputs = build.cycle_inputs();
        let breakdown = calc
            .compute_breakdown(
                &build.stat_snapshot().unwrap(),
                &inputs.frequencies,
                &inputs.crit_rates,
                &inputs.procs,
            )
            .unwrap();
        assert!(breakdown.contains("mh_mutilate"));
        assert!(breakdown.contains("oh_mutilate"));
        assert!(breakdown.contains("mh_autoattack"));
    }
}
