//! Incident window and perturbation model.

use mirage_tables::{IncidentRecord, TimeIndex};

/// Incident name recorded in the incidents table.
pub const INCIDENT_NAME: &str = "INC-001: latency + errors during peak traffic";

/// One-line summary recorded in the incidents table.
pub const INCIDENT_SUMMARY: &str =
    "Traffic spike coincides with elevated tail latency and higher error rates.";

/// Suspected cause recorded in the incidents table.
pub const INCIDENT_CAUSE: &str =
    "Capacity saturation and downstream dependency slowness (synthetic).";

/// A half-open incident window with its perturbation factors.
///
/// The window covers minutes `start_min .. start_min + duration_min`.
/// Inside it, traffic surges multiplicatively, the error rate gets an
/// additive bump before clamping, and each latency percentile is
/// stretched by its own factor, tails more than the median.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncidentWindow {
    /// First minute of the window.
    pub start_min: u64,
    /// Window length in minutes.
    pub duration_min: u64,
    /// Multiplicative traffic surge.
    pub traffic_factor: f64,
    /// Additive error-rate bump, applied before clamping.
    pub error_bump: f64,
    /// Multiplicative p50 stretch.
    pub p50_factor: f64,
    /// Multiplicative p95 stretch.
    pub p95_factor: f64,
    /// Multiplicative p99 stretch.
    pub p99_factor: f64,
}

impl Default for IncidentWindow {
    /// Day 3 at 09:00 for 90 minutes, with the standard surge factors.
    fn default() -> Self {
        Self {
            start_min: 3 * 1440 + 9 * 60,
            duration_min: 90,
            traffic_factor: 1.35,
            error_bump: 0.02,
            p50_factor: 1.6,
            p95_factor: 2.0,
            p99_factor: 2.4,
        }
    }
}

impl IncidentWindow {
    /// Creates a window at the given start with the standard factors.
    #[must_use]
    pub fn new(start_min: u64, duration_min: u64) -> Self {
        Self {
            start_min,
            duration_min,
            ..Self::default()
        }
    }

    /// Returns true when the minute falls inside the window.
    #[must_use]
    pub const fn contains(&self, minute: u64) -> bool {
        minute >= self.start_min && minute - self.start_min < self.duration_min
    }

    /// One past the last minute of the window, saturating at `u64::MAX`.
    #[must_use]
    pub const fn end_min(&self) -> u64 {
        self.start_min.saturating_add(self.duration_min)
    }

    /// Materializes the incident record against a run's time index.
    ///
    /// Both endpoints are clamped to the last index, so a window ending
    /// flush with the horizon records the final minute as its end.
    #[must_use]
    pub fn record(&self, service: impl Into<String>, index: &TimeIndex) -> IncidentRecord {
        let last = index.len().saturating_sub(1);
        let start_idx = usize::try_from(self.start_min).unwrap_or(usize::MAX).min(last);
        let end_idx = usize::try_from(self.end_min()).unwrap_or(usize::MAX).min(last);
        let start_ts = index.get(start_idx).unwrap_or_else(|| index.end());
        let end_ts = index.get(end_idx).unwrap_or_else(|| index.end());

        IncidentRecord {
            service: service.into(),
            incident_name: INCIDENT_NAME.to_string(),
            start_ts,
            end_ts,
            summary: INCIDENT_SUMMARY.to_string(),
            suspected_cause: INCIDENT_CAUSE.to_string(),
        }
    }
}
