//! Analyzer configuration.

use crate::error::{Error, Result};

/// How traffic and error minutes are matched during aggregation.
///
/// Error rows whose (timestamp, service) pair never appears in the
/// traffic table are discarded under both policies: an error count
/// without a request volume has no usable rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JoinPolicy {
    /// Keep every traffic minute; minutes with no matching error row
    /// count zero errors.
    #[default]
    TrafficLeft,
    /// Keep only minutes present in both tables.
    Inner,
}

impl JoinPolicy {
    /// True when missing error rows are treated as zero errors.
    #[must_use]
    pub const fn fills_missing_errors(self) -> bool {
        matches!(self, Self::TrafficLeft)
    }
}

/// SLO analysis parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SloConfig {
    /// Availability target in the open interval (0, 1).
    pub target: f64,
    /// Rolling burn-rate window in minutes.
    pub window_minutes: usize,
    /// Join policy for the traffic/errors merge.
    pub join: JoinPolicy,
}

impl Default for SloConfig {
    fn default() -> Self {
        Self {
            target: 0.999,
            window_minutes: 60,
            join: JoinPolicy::default(),
        }
    }
}

impl SloConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the availability target.
    #[must_use]
    pub const fn with_target(mut self, target: f64) -> Self {
        self.target = target;
        self
    }

    /// Sets the rolling window length in minutes.
    #[must_use]
    pub const fn with_window_minutes(mut self, window_minutes: usize) -> Self {
        self.window_minutes = window_minutes;
        self
    }

    /// Sets the join policy.
    #[must_use]
    pub const fn with_join(mut self, join: JoinPolicy) -> Self {
        self.join = join;
        self
    }

    /// The error budget implied by the target.
    #[must_use]
    pub fn budget(&self) -> f64 {
        1.0 - self.target
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when the target lies outside
    /// (0, 1) or the window is zero minutes.
    pub fn validate(&self) -> Result<()> {
        if !self.target.is_finite() || self.target <= 0.0 || self.target >= 1.0 {
            return Err(Error::InvalidConfig(format!(
                "target must lie in (0, 1), got {}",
                self.target
            )));
        }
        if self.window_minutes == 0 {
            return Err(Error::InvalidConfig(
                "window must cover at least one minute".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SloConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.budget() - 0.001).abs() < 1e-12);
        assert_eq!(config.window_minutes, 60);
        assert_eq!(config.join, JoinPolicy::TrafficLeft);
    }

    #[test]
    fn rejects_target_outside_open_interval() {
        for target in [0.0, 1.0, -0.5, 2.0, f64::NAN] {
            let config = SloConfig::default().with_target(target);
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        }
    }

    #[test]
    fn rejects_zero_window() {
        let config = SloConfig::default().with_window_minutes(0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn join_policy_reports_fill_behavior() {
        assert!(JoinPolicy::TrafficLeft.fills_missing_errors());
        assert!(!JoinPolicy::Inner.fills_missing_errors());
    }
}
