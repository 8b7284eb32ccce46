//! Generate command implementation.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use mirage_synth::{IncidentWindow, SynthConfig};
use mirage_tables::{index, CsvStore};
use tracing::info;

/// Arguments for `mirage generate`.
#[derive(Args)]
pub struct GenerateArgs {
    /// Service name stamped on every row
    #[arg(short, long, default_value = "orders-api")]
    service: String,

    /// Comma-separated region names
    #[arg(short, long, default_value = "us-east,us-west,eu-west")]
    regions: String,

    /// Number of minutes to synthesize
    #[arg(short, long, default_value_t = 10_080)]
    minutes: u64,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Incident start, minutes from the beginning of the run
    #[arg(long, default_value_t = 4_860)]
    incident_start: u64,

    /// Incident duration in minutes
    #[arg(long, default_value_t = 90)]
    incident_duration: u64,

    /// Timestamp of the final minute (RFC 3339); defaults to the current minute
    #[arg(long)]
    end_ts: Option<String>,

    /// Output directory for the CSV tables
    #[arg(short, long, default_value = "data")]
    out: String,
}

/// Runs the generate command.
pub fn run(args: &GenerateArgs) -> Result<()> {
    info!(
        "Synthesizing {} minutes for service: {}",
        args.minutes, args.service
    );

    let end = resolve_end(args.end_ts.as_deref())?;
    let region_names: Vec<&str> = args
        .regions
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();

    let config = SynthConfig::default()
        .with_service(args.service.as_str())
        .with_region_names(region_names)
        .with_minutes(args.minutes)
        .with_seed(args.seed)
        .with_end(end)
        .with_incident(IncidentWindow::new(
            args.incident_start,
            args.incident_duration,
        ));

    let dataset = mirage_synth::synthesize(config).context("Failed to synthesize dataset")?;
    let summary = dataset.summary();
    info!(
        "Peak rps: {:.2}, mean error rate: {:.5}",
        summary.peak_rps, summary.avg_error_rate
    );
    info!(
        "Incident window: {} -> {}",
        dataset.incident.start_ts, dataset.incident.end_ts
    );
    info!("Dataset fingerprint: {:016x}", dataset.fingerprint());

    let store = CsvStore::new(&args.out);
    let written = store.persist(&dataset).context("Failed to write CSV tables")?;
    for path in &written {
        info!("Wrote {}", path.display());
    }

    Ok(())
}

fn resolve_end(end_ts: Option<&str>) -> Result<DateTime<Utc>> {
    match end_ts {
        Some(raw) => {
            let parsed = DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("Failed to parse end timestamp: {raw}"))?;
            Ok(parsed.with_timezone(&Utc))
        }
        None => Ok(index::truncate_to_minute(Utc::now())),
    }
}
