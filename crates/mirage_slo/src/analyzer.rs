//! SLO burn-rate analysis over telemetry tables.

use crate::aggregate::{self, ServiceMinute};
use crate::burn::RollingMean;
use crate::config::SloConfig;
use crate::error::{Error, Result};
use mirage_tables::{ErrorRow, SloRow, TrafficRow};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

const SECONDS_PER_MINUTE: f64 = 60.0;

/// Derives per-minute SLO rows from traffic and error tables.
///
/// Every output row carries the request volume, observed error rate,
/// availability, and the rolling burn rate against the configured
/// error budget. Burn rate reads zero until the window has seen a
/// full history for that service.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: SloConfig,
}

impl Analyzer {
    /// Creates an analyzer after validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when the target or window is
    /// out of bounds.
    pub fn new(config: SloConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the validated configuration.
    #[must_use]
    pub const fn config(&self) -> &SloConfig {
        &self.config
    }

    /// Runs the analysis.
    ///
    /// Rows are emitted timestamp-major, then by service name. Each
    /// service keeps its own rolling window, so interleaved services
    /// never share burn-rate history.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] when either input table is empty
    /// or the join leaves no service minutes to analyze.
    pub fn analyze(&self, traffic: &[TrafficRow], errors: &[ErrorRow]) -> Result<SloReport> {
        if traffic.is_empty() {
            return Err(Error::InvalidData("traffic table is empty".into()));
        }
        if errors.is_empty() {
            return Err(Error::InvalidData("errors table is empty".into()));
        }

        let minutes = aggregate::join_minutes(traffic, errors, self.config.join);
        if minutes.is_empty() {
            return Err(Error::InvalidData(
                "join produced no service minutes".into(),
            ));
        }

        let budget = self.config.budget();
        let mut windows: HashMap<String, RollingMean> = HashMap::new();
        let mut rows = Vec::with_capacity(minutes.len());
        for minute in minutes {
            rows.push(self.slo_row(minute, budget, &mut windows));
        }

        let summary = SloSummary::from_rows(&rows);
        debug!(
            "analyzed {} service minutes, peak burn rate {:.3}",
            summary.row_count, summary.peak_burn_rate
        );
        Ok(SloReport { rows, summary })
    }

    #[allow(clippy::cast_precision_loss)]
    fn slo_row(
        &self,
        minute: ServiceMinute,
        budget: f64,
        windows: &mut HashMap<String, RollingMean>,
    ) -> SloRow {
        let requests_per_minute = minute.rps * SECONDS_PER_MINUTE;
        let error_rate = if requests_per_minute > 0.0 {
            minute.errors_per_minute as f64 / requests_per_minute
        } else {
            0.0
        };
        let availability = 1.0 - error_rate;

        let window = windows
            .entry(minute.service.clone())
            .or_insert_with(|| RollingMean::new(self.config.window_minutes));
        let burn_rate_1h = window.push(error_rate).map_or(0.0, |mean| mean / budget);

        SloRow {
            ts: minute.ts,
            service: minute.service,
            rps: minute.rps,
            requests_per_minute,
            errors_per_minute: minute.errors_per_minute,
            error_rate,
            availability,
            burn_rate_1h,
        }
    }
}

/// Analysis output: the SLO rows plus aggregate statistics.
#[derive(Debug, Clone)]
pub struct SloReport {
    /// Per-minute SLO rows in output order.
    pub rows: Vec<SloRow>,
    /// Aggregate statistics over the rows.
    pub summary: SloSummary,
}

/// Aggregate statistics for one analysis run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SloSummary {
    /// Number of SLO rows emitted.
    pub row_count: usize,
    /// Highest burn rate observed.
    pub peak_burn_rate: f64,
    /// Minutes whose burn rate exceeded 1.0.
    pub minutes_over_budget: usize,
    /// Lowest availability observed.
    pub min_availability: f64,
    /// Total requests across all rows.
    pub total_requests: f64,
}

impl SloSummary {
    /// Computes summary statistics over finished rows.
    #[must_use]
    pub fn from_rows(rows: &[SloRow]) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let mut summary = Self {
            row_count: rows.len(),
            peak_burn_rate: 0.0,
            minutes_over_budget: 0,
            min_availability: f64::INFINITY,
            total_requests: 0.0,
        };
        for row in rows {
            summary.peak_burn_rate = summary.peak_burn_rate.max(row.burn_rate_1h);
            if row.burn_rate_1h > 1.0 {
                summary.minutes_over_budget += 1;
            }
            summary.min_availability = summary.min_availability.min(row.availability);
            summary.total_requests += row.requests_per_minute;
        }
        summary
    }
}
