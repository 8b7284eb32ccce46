//! Dataset container for one synthesis pass.

use crate::row::{ErrorRow, IncidentRecord, LatencyRow, TrafficRow};
use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// All tables produced by one synthesis pass.
///
/// A dataset is generated once, written once, and consumed read-only by
/// analysis; nothing mutates it after creation.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Per-minute regional traffic.
    pub traffic: Vec<TrafficRow>,
    /// Per-minute regional error observations.
    pub errors: Vec<ErrorRow>,
    /// Per-minute regional latency percentiles.
    pub latency: Vec<LatencyRow>,
    /// The injected incident.
    pub incident: IncidentRecord,
}

impl Dataset {
    /// Returns a stable hash of the numeric columns.
    ///
    /// Timestamps are excluded, so runs anchored at different wall-clock
    /// ends still compare equal when their numbers agree.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut bytes = Vec::new();
        for row in &self.traffic {
            bytes.extend_from_slice(row.service.as_bytes());
            bytes.extend_from_slice(row.region.as_bytes());
            bytes.extend_from_slice(&row.rps.to_le_bytes());
        }
        for row in &self.errors {
            bytes.extend_from_slice(row.service.as_bytes());
            bytes.extend_from_slice(row.region.as_bytes());
            bytes.extend_from_slice(&row.error_rate.to_le_bytes());
            bytes.extend_from_slice(&row.errors_per_minute.to_le_bytes());
        }
        for row in &self.latency {
            bytes.extend_from_slice(row.service.as_bytes());
            bytes.extend_from_slice(row.region.as_bytes());
            bytes.extend_from_slice(&row.p50_ms.to_le_bytes());
            bytes.extend_from_slice(&row.p95_ms.to_le_bytes());
            bytes.extend_from_slice(&row.p99_ms.to_le_bytes());
        }
        xxh64(&bytes, 0)
    }

    /// Returns headline statistics for logging and summaries.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn summary(&self) -> DatasetSummary {
        let peak_rps = self.traffic.iter().map(|r| r.rps).fold(0.0, f64::max);
        let avg_error_rate = if self.errors.is_empty() {
            0.0
        } else {
            self.errors.iter().map(|r| r.error_rate).sum::<f64>() / self.errors.len() as f64
        };
        let incident_minutes =
            u64::try_from((self.incident.end_ts - self.incident.start_ts).num_minutes())
                .unwrap_or(0);

        DatasetSummary {
            traffic_rows: self.traffic.len(),
            error_rows: self.errors.len(),
            latency_rows: self.latency.len(),
            peak_rps,
            avg_error_rate,
            incident_minutes,
        }
    }
}

/// Headline statistics over a dataset.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DatasetSummary {
    /// Rows in the traffic table.
    pub traffic_rows: usize,
    /// Rows in the errors table.
    pub error_rows: usize,
    /// Rows in the latency table.
    pub latency_rows: usize,
    /// Highest regional requests per second.
    pub peak_rps: f64,
    /// Mean regional error rate.
    pub avg_error_rate: f64,
    /// Minutes between the incident start and end timestamps.
    pub incident_minutes: u64,
}
