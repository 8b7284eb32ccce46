//! Row types for the five Mirage tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One minute of regional request traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficRow {
    /// Minute timestamp.
    pub ts: DateTime<Utc>,
    /// Service the traffic belongs to.
    pub service: String,
    /// Region the traffic was served from.
    pub region: String,
    /// Mean requests per second over the minute.
    pub rps: f64,
}

impl TrafficRow {
    /// Creates a new traffic row.
    #[must_use]
    pub fn new(
        ts: DateTime<Utc>,
        service: impl Into<String>,
        region: impl Into<String>,
        rps: f64,
    ) -> Self {
        Self {
            ts,
            service: service.into(),
            region: region.into(),
            rps,
        }
    }
}

/// One minute of regional error observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRow {
    /// Minute timestamp.
    pub ts: DateTime<Utc>,
    /// Service the errors belong to.
    pub service: String,
    /// Region the errors were observed in.
    pub region: String,
    /// Fraction of requests that failed, in `[0, 0.2]`.
    pub error_rate: f64,
    /// Failed requests counted over the minute.
    pub errors_per_minute: u64,
}

impl ErrorRow {
    /// Creates a new error row.
    #[must_use]
    pub fn new(
        ts: DateTime<Utc>,
        service: impl Into<String>,
        region: impl Into<String>,
        error_rate: f64,
        errors_per_minute: u64,
    ) -> Self {
        Self {
            ts,
            service: service.into(),
            region: region.into(),
            error_rate,
            errors_per_minute,
        }
    }
}

/// One minute of regional latency percentiles.
///
/// Percentiles are ordered: `0 < p50_ms <= p95_ms <= p99_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyRow {
    /// Minute timestamp.
    pub ts: DateTime<Utc>,
    /// Service the latencies belong to.
    pub service: String,
    /// Region the latencies were measured in.
    pub region: String,
    /// Median latency in milliseconds.
    pub p50_ms: f64,
    /// 95th percentile latency in milliseconds.
    pub p95_ms: f64,
    /// 99th percentile latency in milliseconds.
    pub p99_ms: f64,
}

impl LatencyRow {
    /// Creates a new latency row.
    #[must_use]
    pub fn new(
        ts: DateTime<Utc>,
        service: impl Into<String>,
        region: impl Into<String>,
        p50_ms: f64,
        p95_ms: f64,
        p99_ms: f64,
    ) -> Self {
        Self {
            ts,
            service: service.into(),
            region: region.into(),
            p50_ms,
            p95_ms,
            p99_ms,
        }
    }
}

/// The incident injected into a synthesis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// Service the incident affected.
    pub service: String,
    /// Human-readable incident name.
    pub incident_name: String,
    /// First affected minute.
    pub start_ts: DateTime<Utc>,
    /// End of the window, clamped to the run horizon.
    pub end_ts: DateTime<Utc>,
    /// One-line description of the observable effect.
    pub summary: String,
    /// Suspected cause recorded for the incident.
    pub suspected_cause: String,
}

/// One minute of derived service-level SLO output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SloRow {
    /// Minute timestamp.
    pub ts: DateTime<Utc>,
    /// Service the row describes.
    pub service: String,
    /// Requests per second summed over regions.
    pub rps: f64,
    /// Request volume for the minute (`rps * 60`).
    pub requests_per_minute: f64,
    /// Failed requests summed over regions.
    pub errors_per_minute: u64,
    /// Failed fraction of the minute's requests.
    pub error_rate: f64,
    /// `1 - error_rate`.
    pub availability: f64,
    /// Rolling error-budget burn rate.
    pub burn_rate_1h: f64,
}
