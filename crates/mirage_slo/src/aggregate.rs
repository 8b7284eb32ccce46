//! Per-service minute aggregation.
//!
//! Regional rows are collapsed into one row per (timestamp, service)
//! pair before any rate math: traffic sums request rates, errors sum
//! counts. Output order is timestamp-major, then service name.

use crate::config::JoinPolicy;
use chrono::{DateTime, Utc};
use mirage_tables::{ErrorRow, TrafficRow};
use std::collections::BTreeMap;

/// One service minute after regional collapse.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceMinute {
    /// Minute timestamp (UTC).
    pub ts: DateTime<Utc>,
    /// Service name.
    pub service: String,
    /// Total requests per second across all regions.
    pub rps: f64,
    /// Total error count across all regions.
    pub errors_per_minute: u64,
}

/// Joins traffic and error rows into per-service minutes.
///
/// Traffic is the driving side. Under [`JoinPolicy::TrafficLeft`] a
/// traffic minute without errors yields a zero error count; under
/// [`JoinPolicy::Inner`] it is dropped. Error minutes without traffic
/// are discarded either way.
#[must_use]
pub fn join_minutes(
    traffic: &[TrafficRow],
    errors: &[ErrorRow],
    policy: JoinPolicy,
) -> Vec<ServiceMinute> {
    let mut rps_by_key: BTreeMap<(DateTime<Utc>, String), f64> = BTreeMap::new();
    for row in traffic {
        *rps_by_key
            .entry((row.ts, row.service.clone()))
            .or_insert(0.0) += row.rps;
    }

    let mut errors_by_key: BTreeMap<(DateTime<Utc>, String), u64> = BTreeMap::new();
    for row in errors {
        *errors_by_key
            .entry((row.ts, row.service.clone()))
            .or_insert(0) += row.errors_per_minute;
    }

    let mut minutes = Vec::with_capacity(rps_by_key.len());
    for ((ts, service), rps) in rps_by_key {
        let matched = errors_by_key.get(&(ts, service.clone())).copied();
        let errors_per_minute = match (matched, policy) {
            (Some(count), _) => count,
            (None, JoinPolicy::TrafficLeft) => 0,
            (None, JoinPolicy::Inner) => continue,
        };
        minutes.push(ServiceMinute {
            ts,
            service,
            rps,
            errors_per_minute,
        });
    }
    minutes
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap() + chrono::Duration::minutes(minute)
    }

    #[test]
    fn regions_collapse_into_one_minute() {
        let traffic = vec![
            TrafficRow::new(ts(0), "orders-api", "us-east", 10.0),
            TrafficRow::new(ts(0), "orders-api", "eu-west", 20.0),
        ];
        let errors = vec![
            ErrorRow::new(ts(0), "orders-api", "us-east", 0.01, 3),
            ErrorRow::new(ts(0), "orders-api", "eu-west", 0.01, 4),
        ];

        let minutes = join_minutes(&traffic, &errors, JoinPolicy::TrafficLeft);
        assert_eq!(minutes.len(), 1);
        assert!((minutes[0].rps - 30.0).abs() < f64::EPSILON);
        assert_eq!(minutes[0].errors_per_minute, 7);
    }

    #[test]
    fn traffic_left_fills_missing_errors_with_zero() {
        let traffic = vec![TrafficRow::new(ts(0), "orders-api", "us-east", 10.0)];
        let minutes = join_minutes(&traffic, &[], JoinPolicy::TrafficLeft);
        assert_eq!(minutes.len(), 1);
        assert_eq!(minutes[0].errors_per_minute, 0);
    }

    #[test]
    fn inner_join_drops_unmatched_traffic() {
        let traffic = vec![
            TrafficRow::new(ts(0), "orders-api", "us-east", 10.0),
            TrafficRow::new(ts(1), "orders-api", "us-east", 12.0),
        ];
        let errors = vec![ErrorRow::new(ts(1), "orders-api", "us-east", 0.01, 2)];

        let minutes = join_minutes(&traffic, &errors, JoinPolicy::Inner);
        assert_eq!(minutes.len(), 1);
        assert_eq!(minutes[0].ts, ts(1));
    }

    #[test]
    fn error_only_minutes_are_discarded() {
        let errors = vec![ErrorRow::new(ts(0), "orders-api", "us-east", 0.01, 2)];
        assert!(join_minutes(&[], &errors, JoinPolicy::TrafficLeft).is_empty());
        assert!(join_minutes(&[], &errors, JoinPolicy::Inner).is_empty());
    }

    #[test]
    fn output_is_timestamp_major_then_service() {
        let traffic = vec![
            TrafficRow::new(ts(1), "billing", "us-east", 5.0),
            TrafficRow::new(ts(0), "orders-api", "us-east", 10.0),
            TrafficRow::new(ts(0), "billing", "us-east", 5.0),
            TrafficRow::new(ts(1), "orders-api", "us-east", 12.0),
        ];

        let minutes = join_minutes(&traffic, &[], JoinPolicy::TrafficLeft);
        let keys: Vec<_> = minutes
            .iter()
            .map(|m| (m.ts, m.service.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (ts(0), "billing"),
                (ts(0), "orders-api"),
                (ts(1), "billing"),
                (ts(1), "orders-api"),
            ]
        );
    }
}
