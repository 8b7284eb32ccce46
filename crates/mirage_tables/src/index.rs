//! Minute-resolution time indexing.

use chrono::{DateTime, Duration, Timelike, Utc};

/// A fixed-step sequence of minute-resolution UTC timestamps.
///
/// The sequence ascends in one-minute steps and ends at an explicit
/// anchor, so `get(i) = end - (len - 1 - i)` minutes. Constructing from
/// `(end, len)` means no instance can violate the fixed-step ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeIndex {
    end: DateTime<Utc>,
    len: usize,
}

impl TimeIndex {
    /// Creates an index of `len` minutes ending at `end`.
    #[must_use]
    pub const fn new(end: DateTime<Utc>, len: usize) -> Self {
        Self { end, len }
    }

    /// Returns the number of minutes in the index.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the index holds no timestamps.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the anchor timestamp of the final minute.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns the timestamp of the first minute, if any.
    #[must_use]
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.get(0)
    }

    /// Returns the timestamp at position `i`, if in range.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<DateTime<Utc>> {
        if i >= self.len {
            return None;
        }
        let back = i64::try_from(self.len - 1 - i).ok()?;
        Some(self.end - Duration::minutes(back))
    }

    /// Iterates the timestamps in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        (0..self.len).filter_map(|i| self.get(i))
    }
}

/// Returns true when the timestamp carries no seconds or sub-seconds.
#[must_use]
pub fn is_minute_aligned(ts: DateTime<Utc>) -> bool {
    ts.second() == 0 && ts.nanosecond() == 0
}

/// Drops the seconds and sub-seconds from a timestamp.
#[must_use]
pub fn truncate_to_minute(ts: DateTime<Utc>) -> DateTime<Utc> {
    let secs = ts.timestamp();
    let aligned = secs - secs.rem_euclid(60);
    DateTime::from_timestamp(aligned, 0).unwrap_or(ts)
}
