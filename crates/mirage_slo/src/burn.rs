//! Rolling-window burn-rate arithmetic.

use std::collections::VecDeque;

/// Fixed-width rolling mean over a stream of samples.
///
/// Yields a value only once the window is full, mirroring how a
/// burn-rate panel stays blank until enough history exists.
#[derive(Debug, Clone)]
pub struct RollingMean {
    window: usize,
    samples: VecDeque<f64>,
    sum: f64,
}

impl RollingMean {
    /// Creates a rolling mean over `window` samples (minimum one).
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            samples: VecDeque::with_capacity(window),
            sum: 0.0,
        }
    }

    /// Number of samples the window holds when full.
    #[must_use]
    pub const fn window(&self) -> usize {
        self.window
    }

    /// Number of samples currently buffered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no samples have been pushed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Pushes a sample and returns the mean once the window is full.
    #[allow(clippy::cast_precision_loss)]
    pub fn push(&mut self, sample: f64) -> Option<f64> {
        self.samples.push_back(sample);
        self.sum += sample;
        if self.samples.len() > self.window {
            if let Some(evicted) = self.samples.pop_front() {
                self.sum -= evicted;
            }
        }
        if self.samples.len() == self.window {
            Some(self.sum / self.window as f64)
        } else {
            None
        }
    }
}
