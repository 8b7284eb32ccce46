//! Analyze command implementation.

use anyhow::{Context, Result};
use clap::Args;
use mirage_slo::{Analyzer, JoinPolicy, SloConfig};
use mirage_tables::CsvStore;
use tracing::info;

/// Arguments for `mirage analyze`.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Directory holding the CSV tables
    #[arg(short, long, default_value = "data")]
    data: String,

    /// Availability target, e.g. 0.999
    #[arg(short, long, default_value_t = 0.999)]
    target: f64,

    /// Rolling burn-rate window in minutes
    #[arg(short, long, default_value_t = 60)]
    window: usize,

    /// Keep only minutes present in both tables
    #[arg(long)]
    inner_join: bool,
}

/// Runs the analyze command.
pub fn run(args: &AnalyzeArgs) -> Result<()> {
    info!("Analyzing tables in: {}", args.data);

    let store = CsvStore::new(&args.data);
    let traffic = store.load_traffic().context("Failed to load traffic table")?;
    let errors = store.load_errors().context("Failed to load errors table")?;
    info!(
        "Loaded {} traffic rows, {} error rows",
        traffic.len(),
        errors.len()
    );

    let join = if args.inner_join {
        JoinPolicy::Inner
    } else {
        JoinPolicy::TrafficLeft
    };
    let config = SloConfig::default()
        .with_target(args.target)
        .with_window_minutes(args.window)
        .with_join(join);

    let analyzer = Analyzer::new(config).context("Invalid SLO configuration")?;
    let report = analyzer
        .analyze(&traffic, &errors)
        .context("SLO analysis failed")?;

    let path = store
        .persist_slo(&report.rows)
        .context("Failed to write SLO table")?;
    info!("Wrote {}", path.display());

    let summary = &report.summary;
    info!(
        "Rows: {}, peak burn rate: {:.3}, minutes over budget: {}",
        summary.row_count, summary.peak_burn_rate, summary.minutes_over_budget
    );
    info!(
        "Min availability: {:.5}, total requests: {:.0}",
        summary.min_availability, summary.total_requests
    );

    Ok(())
}
