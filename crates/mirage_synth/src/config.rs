//! Synthesis configuration and validation.

use crate::error::{Error, Result};
use crate::incident::IncidentWindow;
use chrono::{DateTime, Duration, Utc};
use mirage_tables::{index, region, Region};
use std::collections::HashSet;

/// Configuration for one synthesis run.
///
/// The defaults reproduce the standard scenario: `orders-api` across the
/// built-in three-region fleet, seven days of per-minute data, seed 42,
/// and one incident on day 3 at 09:00. The default horizon ends one week
/// after the Unix epoch so default runs are fully deterministic; callers
/// wanting current data set `end` explicitly (the CLI anchors it to the
/// current minute).
#[derive(Debug, Clone)]
pub struct SynthConfig {
    /// Service name stamped on every row.
    pub service: String,
    /// Regions to synthesize, in output order.
    pub regions: Vec<Region>,
    /// Number of minutes in the run.
    pub minutes: u64,
    /// Seed for the deterministic random stream.
    pub seed: u64,
    /// Timestamp of the final minute; must be minute-aligned.
    pub end: DateTime<Utc>,
    /// The injected incident window.
    pub incident: IncidentWindow,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            service: "orders-api".to_string(),
            regions: region::default_fleet(),
            minutes: 7 * 1440,
            seed: 42,
            end: DateTime::UNIX_EPOCH + Duration::minutes(7 * 1440 - 1),
            incident: IncidentWindow::default(),
        }
    }
}

impl SynthConfig {
    /// Sets the service name.
    #[must_use]
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Sets the region list.
    #[must_use]
    pub fn with_regions(mut self, regions: Vec<Region>) -> Self {
        self.regions = regions;
        self
    }

    /// Sets the regions by name, using the fleet bias for each.
    #[must_use]
    pub fn with_region_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = names.into_iter().map(Region::named).collect();
        self
    }

    /// Sets the run length in minutes.
    #[must_use]
    pub const fn with_minutes(mut self, minutes: u64) -> Self {
        self.minutes = minutes;
        self
    }

    /// Sets the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the horizon anchor.
    #[must_use]
    pub const fn with_end(mut self, end: DateTime<Utc>) -> Self {
        self.end = end;
        self
    }

    /// Sets the incident window.
    #[must_use]
    pub const fn with_incident(mut self, incident: IncidentWindow) -> Self {
        self.incident = incident;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error naming the violated bound: empty service name,
    /// empty or duplicated regions, a negative or non-finite bias, a zero
    /// horizon, a misaligned `end`, or an incident window that starts at
    /// or runs past the horizon.
    pub fn validate(&self) -> Result<()> {
        if self.service.trim().is_empty() {
            return Err(Error::InvalidConfig("service name is empty".to_string()));
        }
        if self.regions.is_empty() {
            return Err(Error::InvalidConfig("region list is empty".to_string()));
        }
        let mut seen = HashSet::new();
        for region in &self.regions {
            if !seen.insert(region.name.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate region '{}'",
                    region.name
                )));
            }
            if !region.bias.is_finite() || region.bias < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "region '{}' has invalid latency bias {}",
                    region.name, region.bias
                )));
            }
        }
        if self.minutes == 0 {
            return Err(Error::InvalidConfig(
                "horizon must be at least 1 minute".to_string(),
            ));
        }
        if !index::is_minute_aligned(self.end) {
            return Err(Error::InvalidConfig(format!(
                "end timestamp {} is not minute-aligned",
                self.end
            )));
        }
        if self.incident.duration_min == 0 {
            return Err(Error::InvalidIncident(
                "duration must be at least 1 minute".to_string(),
            ));
        }
        if self.incident.start_min >= self.minutes {
            return Err(Error::InvalidIncident(format!(
                "starts at minute {} but the horizon is {} minutes",
                self.incident.start_min, self.minutes
            )));
        }
        // start_min < minutes holds here, so the subtraction cannot
        // underflow and the bound stays exact for any u64 duration.
        if self.incident.duration_min > self.minutes - self.incident.start_min {
            return Err(Error::InvalidIncident(format!(
                "runs to minute {} but the horizon is {} minutes",
                self.incident.end_min(),
                self.minutes
            )));
        }
        Ok(())
    }
}
