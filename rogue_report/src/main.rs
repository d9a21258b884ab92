//! rogue_report - Damage breakdown and EP report for rogue build files
//!
//! Run with: `rogue_report <command> <build.toml>`

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{Breakdown, Ep, Talents};

/// Damage breakdown and stat weights for rogue builds
#[derive(Parser)]
#[command(name = "rogue_report")]
#[command(about = "Rogue DPS breakdown and EP calculator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Per-ability DPS for a build
    Breakdown(Breakdown),

    /// Stat weights for a build
    Ep(Ep),

    /// Decode a talent string and list what the level allows
    Talents(Talents),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Breakdown(cmd) => cmd.execute(),
        Command::Ep(cmd) => cmd.execute(),
        Command::Talents(cmd) => cmd.execute(),
    }
}
