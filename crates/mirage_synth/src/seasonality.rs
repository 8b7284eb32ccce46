//! Daily seasonality model.
//!
//! Traffic and latency baselines follow a smooth sinusoidal daily cycle
//! with an overnight trough and a midday peak.

use std::f64::consts::{FRAC_PI_2, TAU};

/// Sinusoidal daily multiplier applied to baseline traffic and latency.
///
/// `multiplier(m) = 1 + amplitude * sin(2pi * (m mod day) / day - pi/2)`,
/// so minute 0 of each day is the trough and the midpoint the peak. With
/// the default amplitude the multiplier stays in `[0.6, 1.4]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyCycle {
    amplitude: f64,
    day_minutes: u64,
}

impl Default for DailyCycle {
    fn default() -> Self {
        Self {
            amplitude: 0.4,
            day_minutes: 1440,
        }
    }
}

impl DailyCycle {
    /// Creates the default cycle: amplitude 0.4 over a 1440-minute day.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the peak-to-baseline amplitude.
    #[must_use]
    pub const fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Sets the cycle length in minutes.
    ///
    /// A zero length is treated as one minute.
    #[must_use]
    pub const fn with_day_minutes(mut self, day_minutes: u64) -> Self {
        self.day_minutes = if day_minutes == 0 { 1 } else { day_minutes };
        self
    }

    /// Returns the multiplier for the given minute index.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn multiplier(&self, minute: u64) -> f64 {
        let phase = (minute % self.day_minutes) as f64 / self.day_minutes as f64;
        1.0 + self.amplitude * (TAU * phase - FRAC_PI_2).sin()
    }
}
