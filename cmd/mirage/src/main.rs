//! Mirage CLI - synthetic service telemetry and SLO analysis.
//!
//! Commands:
//! - `mirage generate` - Synthesize telemetry tables and write them as CSV
//! - `mirage analyze` - Derive the SLO burn-rate table from written tables

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::analyze::AnalyzeArgs;
use commands::generate::GenerateArgs;

#[derive(Parser)]
#[command(name = "mirage")]
#[command(about = "Deterministic synthetic telemetry with SLO burn-rate analysis")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize per-minute telemetry and persist it as CSV tables
    Generate(GenerateArgs),

    /// Derive the SLO burn-rate table from traffic and errors tables
    Analyze(AnalyzeArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Generate(args) => commands::generate::run(&args),
        Commands::Analyze(args) => commands::analyze::run(&args),
    }
}
