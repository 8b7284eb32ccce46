//! CSV persistence for the Mirage tables.
//!
//! Values are rounded at the write boundary only: `rps` to 2 decimals,
//! `error_rate` to 5, latency percentiles to 2. In-memory tables keep
//! full precision. A whole synthesis pass is persisted all or nothing:
//! every table is staged to a `.tmp` sibling first and the renames only
//! happen after all stages succeeded.

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::row::{ErrorRow, IncidentRecord, LatencyRow, SloRow, TrafficRow};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Canonical file name of the traffic table.
pub const TRAFFIC_FILE: &str = "traffic.csv";
/// Canonical file name of the errors table.
pub const ERRORS_FILE: &str = "errors.csv";
/// Canonical file name of the latency table.
pub const LATENCY_FILE: &str = "latency.csv";
/// Canonical file name of the incidents table.
pub const INCIDENTS_FILE: &str = "incidents.csv";
/// Canonical file name of the SLO table.
pub const SLO_FILE: &str = "slo.csv";

fn round_dp(value: f64, dp: i32) -> f64 {
    let scale = 10f64.powi(dp);
    (value * scale).round() / scale
}

fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_ts(table: &'static str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::load(table, format!("invalid timestamp '{raw}': {e}")))
}

fn open_table(table: &'static str, path: &Path) -> Result<fs::File> {
    fs::File::open(path)
        .map_err(|e| Error::load(table, format!("failed to open {}: {e}", path.display())))
}

/// Writes the traffic table as CSV.
///
/// # Errors
///
/// Returns an error if serialization or the underlying writer fails.
pub fn write_traffic<W: Write>(writer: W, rows: &[TrafficRow]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(TrafficCsvRecord::from_row(row))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Reads the traffic table from CSV.
///
/// # Errors
///
/// Returns an error on malformed rows, missing columns, or zero data rows.
pub fn read_traffic<R: Read>(reader: R) -> Result<Vec<TrafficRow>> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.deserialize() {
        let record: TrafficCsvRecord =
            result.map_err(|e| Error::load("traffic", format!("bad row: {e}")))?;
        rows.push(record.into_row()?);
    }
    if rows.is_empty() {
        return Err(Error::Empty("traffic"));
    }
    Ok(rows)
}

/// Reads the traffic table from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed.
pub fn read_traffic_file(path: impl AsRef<Path>) -> Result<Vec<TrafficRow>> {
    read_traffic(open_table("traffic", path.as_ref())?)
}

/// Writes the errors table as CSV.
///
/// # Errors
///
/// Returns an error if serialization or the underlying writer fails.
pub fn write_errors<W: Write>(writer: W, rows: &[ErrorRow]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(ErrorCsvRecord::from_row(row))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Reads the errors table from CSV.
///
/// # Errors
///
/// Returns an error on malformed rows, missing columns, or zero data rows.
pub fn read_errors<R: Read>(reader: R) -> Result<Vec<ErrorRow>> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.deserialize() {
        let record: ErrorCsvRecord =
            result.map_err(|e| Error::load("errors", format!("bad row: {e}")))?;
        rows.push(record.into_row()?);
    }
    if rows.is_empty() {
        return Err(Error::Empty("errors"));
    }
    Ok(rows)
}

/// Reads the errors table from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed.
pub fn read_errors_file(path: impl AsRef<Path>) -> Result<Vec<ErrorRow>> {
    read_errors(open_table("errors", path.as_ref())?)
}

/// Writes the latency table as CSV.
///
/// # Errors
///
/// Returns an error if serialization or the underlying writer fails.
pub fn write_latency<W: Write>(writer: W, rows: &[LatencyRow]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(LatencyCsvRecord::from_row(row))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Reads the latency table from CSV.
///
/// # Errors
///
/// Returns an error on malformed rows, missing columns, or zero data rows.
pub fn read_latency<R: Read>(reader: R) -> Result<Vec<LatencyRow>> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.deserialize() {
        let record: LatencyCsvRecord =
            result.map_err(|e| Error::load("latency", format!("bad row: {e}")))?;
        rows.push(record.into_row()?);
    }
    if rows.is_empty() {
        return Err(Error::Empty("latency"));
    }
    Ok(rows)
}

/// Reads the latency table from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed.
pub fn read_latency_file(path: impl AsRef<Path>) -> Result<Vec<LatencyRow>> {
    read_latency(open_table("latency", path.as_ref())?)
}

/// Writes the incidents table as CSV.
///
/// # Errors
///
/// Returns an error if serialization or the underlying writer fails.
pub fn write_incidents<W: Write>(writer: W, records: &[IncidentRecord]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(IncidentCsvRecord::from_record(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Reads the incidents table from CSV.
///
/// # Errors
///
/// Returns an error on malformed rows, missing columns, or zero data rows.
pub fn read_incidents<R: Read>(reader: R) -> Result<Vec<IncidentRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut records = Vec::new();
    for result in csv_reader.deserialize() {
        let record: IncidentCsvRecord =
            result.map_err(|e| Error::load("incidents", format!("bad row: {e}")))?;
        records.push(record.into_record()?);
    }
    if records.is_empty() {
        return Err(Error::Empty("incidents"));
    }
    Ok(records)
}

/// Reads the incidents table from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed.
pub fn read_incidents_file(path: impl AsRef<Path>) -> Result<Vec<IncidentRecord>> {
    read_incidents(open_table("incidents", path.as_ref())?)
}

/// Writes the SLO table as CSV.
///
/// Derived values are written at full precision.
///
/// # Errors
///
/// Returns an error if serialization or the underlying writer fails.
pub fn write_slo<W: Write>(writer: W, rows: &[SloRow]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(SloCsvRecord::from_row(row))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Reads the SLO table from CSV.
///
/// # Errors
///
/// Returns an error on malformed rows, missing columns, or zero data rows.
pub fn read_slo<R: Read>(reader: R) -> Result<Vec<SloRow>> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.deserialize() {
        let record: SloCsvRecord = result.map_err(|e| Error::load("slo", format!("bad row: {e}")))?;
        rows.push(record.into_row()?);
    }
    if rows.is_empty() {
        return Err(Error::Empty("slo"));
    }
    Ok(rows)
}

/// Reads the SLO table from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed.
pub fn read_slo_file(path: impl AsRef<Path>) -> Result<Vec<SloRow>> {
    read_slo(open_table("slo", path.as_ref())?)
}

/// Directory-level handle over the canonical table files.
#[derive(Debug, Clone)]
pub struct CsvStore {
    root: PathBuf,
}

impl CsvStore {
    /// Creates a store rooted at the given directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the store directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path of a table file inside the store.
    #[must_use]
    pub fn table_path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// Persists all four synthesized tables of a dataset.
    ///
    /// Returns the written paths in table order.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, staging, or a rename fails.
    /// Staged temporaries are removed on failure, so a failed pass never
    /// replaces existing tables.
    pub fn persist(&self, dataset: &Dataset) -> Result<Vec<PathBuf>> {
        let mut tables: Vec<(&'static str, Vec<u8>)> = Vec::with_capacity(4);

        let mut buf = Vec::new();
        write_traffic(&mut buf, &dataset.traffic)?;
        tables.push((TRAFFIC_FILE, buf));

        let mut buf = Vec::new();
        write_errors(&mut buf, &dataset.errors)?;
        tables.push((ERRORS_FILE, buf));

        let mut buf = Vec::new();
        write_latency(&mut buf, &dataset.latency)?;
        tables.push((LATENCY_FILE, buf));

        let mut buf = Vec::new();
        write_incidents(&mut buf, std::slice::from_ref(&dataset.incident))?;
        tables.push((INCIDENTS_FILE, buf));

        self.stage_and_commit(&tables)
    }

    /// Persists the SLO table, staged like `persist`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, staging, or the rename fails.
    pub fn persist_slo(&self, rows: &[SloRow]) -> Result<PathBuf> {
        let mut buf = Vec::new();
        write_slo(&mut buf, rows)?;
        self.stage_and_commit(&[(SLO_FILE, buf)])?;
        Ok(self.table_path(SLO_FILE))
    }

    /// Loads the traffic table from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, malformed, or empty.
    pub fn load_traffic(&self) -> Result<Vec<TrafficRow>> {
        read_traffic_file(self.table_path(TRAFFIC_FILE))
    }

    /// Loads the errors table from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, malformed, or empty.
    pub fn load_errors(&self) -> Result<Vec<ErrorRow>> {
        read_errors_file(self.table_path(ERRORS_FILE))
    }

    /// Loads the latency table from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, malformed, or empty.
    pub fn load_latency(&self) -> Result<Vec<LatencyRow>> {
        read_latency_file(self.table_path(LATENCY_FILE))
    }

    /// Loads the incidents table from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, malformed, or empty.
    pub fn load_incidents(&self) -> Result<Vec<IncidentRecord>> {
        read_incidents_file(self.table_path(INCIDENTS_FILE))
    }

    /// Loads the SLO table from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, malformed, or empty.
    pub fn load_slo(&self) -> Result<Vec<SloRow>> {
        read_slo_file(self.table_path(SLO_FILE))
    }

    fn stage_and_commit(&self, tables: &[(&'static str, Vec<u8>)]) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.root)?;

        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(tables.len());
        for (name, bytes) in tables {
            let tmp = self.root.join(format!("{name}.tmp"));
            if let Err(e) = fs::write(&tmp, bytes) {
                Self::discard(&staged);
                let _ = fs::remove_file(&tmp);
                return Err(e.into());
            }
            staged.push((tmp, self.root.join(name)));
        }

        let mut written = Vec::with_capacity(staged.len());
        for (tmp, target) in &staged {
            if let Err(e) = fs::rename(tmp, target) {
                Self::discard(&staged);
                return Err(e.into());
            }
            debug!("wrote {}", target.display());
            written.push(target.clone());
        }
        Ok(written)
    }

    fn discard(staged: &[(PathBuf, PathBuf)]) {
        for (tmp, _) in staged {
            let _ = fs::remove_file(tmp);
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TrafficCsvRecord {
    ts: String,
    service: String,
    region: String,
    rps: f64,
}

impl TrafficCsvRecord {
    fn from_row(row: &TrafficRow) -> Self {
        Self {
            ts: format_ts(row.ts),
            service: row.service.clone(),
            region: row.region.clone(),
            rps: round_dp(row.rps, 2),
        }
    }

    fn into_row(self) -> Result<TrafficRow> {
        Ok(TrafficRow {
            ts: parse_ts("traffic", &self.ts)?,
            service: self.service,
            region: self.region,
            rps: self.rps,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ErrorCsvRecord {
    ts: String,
    service: String,
    region: String,
    error_rate: f64,
    errors_per_minute: u64,
}

impl ErrorCsvRecord {
    fn from_row(row: &ErrorRow) -> Self {
        Self {
            ts: format_ts(row.ts),
            service: row.service.clone(),
            region: row.region.clone(),
            error_rate: round_dp(row.error_rate, 5),
            errors_per_minute: row.errors_per_minute,
        }
    }

    fn into_row(self) -> Result<ErrorRow> {
        Ok(ErrorRow {
            ts: parse_ts("errors", &self.ts)?,
            service: self.service,
            region: self.region,
            error_rate: self.error_rate,
            errors_per_minute: self.errors_per_minute,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LatencyCsvRecord {
    ts: String,
    service: String,
    region: String,
    p50_ms: f64,
    p95_ms: f64,
    p99_ms: f64,
}

impl LatencyCsvRecord {
    fn from_row(row: &LatencyRow) -> Self {
        Self {
            ts: format_ts(row.ts),
            service: row.service.clone(),
            region: row.region.clone(),
            p50_ms: round_dp(row.p50_ms, 2),
            p95_ms: round_dp(row.p95_ms, 2),
            p99_ms: round_dp(row.p99_ms, 2),
        }
    }

    fn into_row(self) -> Result<LatencyRow> {
        Ok(LatencyRow {
            ts: parse_ts("latency", &self.ts)?,
            service: self.service,
            region: self.region,
            p50_ms: self.p50_ms,
            p95_ms: self.p95_ms,
            p99_ms: self.p99_ms,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct IncidentCsvRecord {
    service: String,
    incident_name: String,
    start_ts: String,
    end_ts: String,
    summary: String,
    suspected_cause: String,
}

impl IncidentCsvRecord {
    fn from_record(record: &IncidentRecord) -> Self {
        Self {
            service: record.service.clone(),
            incident_name: record.incident_name.clone(),
            start_ts: format_ts(record.start_ts),
            end_ts: format_ts(record.end_ts),
            summary: record.summary.clone(),
            suspected_cause: record.suspected_cause.clone(),
        }
    }

    fn into_record(self) -> Result<IncidentRecord> {
        Ok(IncidentRecord {
            start_ts: parse_ts("incidents", &self.start_ts)?,
            end_ts: parse_ts("incidents", &self.end_ts)?,
            service: self.service,
            incident_name: self.incident_name,
            summary: self.summary,
            suspected_cause: self.suspected_cause,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SloCsvRecord {
    ts: String,
    service: String,
    rps: f64,
    requests_per_minute: f64,
    errors_per_minute: u64,
    error_rate: f64,
    availability: f64,
    burn_rate_1h: f64,
}

impl SloCsvRecord {
    fn from_row(row: &SloRow) -> Self {
        Self {
            ts: format_ts(row.ts),
            service: row.service.clone(),
            rps: row.rps,
            requests_per_minute: row.requests_per_minute,
            errors_per_minute: row.errors_per_minute,
            error_rate: row.error_rate,
            availability: row.availability,
            burn_rate_1h: row.burn_rate_1h,
        }
    }

    fn into_row(self) -> Result<SloRow> {
        Ok(SloRow {
            ts: parse_ts("slo", &self.ts)?,
            service: self.service,
            rps: self.rps,
            requests_per_minute: self.requests_per_minute,
            errors_per_minute: self.errors_per_minute,
            error_rate: self.error_rate,
            availability: self.availability,
            burn_rate_1h: self.burn_rate_1h,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, minute, 0).unwrap()
    }

    #[test]
    fn traffic_round_trip() {
        let rows = vec![
            TrafficRow::new(ts(0), "orders-api", "us-east", 131.2789),
            TrafficRow::new(ts(1), "orders-api", "us-west", 97.6),
        ];

        let mut buf = Vec::new();
        write_traffic(&mut buf, &rows).unwrap();
        let loaded = read_traffic(buf.as_slice()).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].ts, ts(0));
        assert_eq!(loaded[0].service, "orders-api");
        assert!((loaded[0].rps - 131.28).abs() < 1e-9);
        assert!((loaded[1].rps - 97.6).abs() < 1e-9);
    }

    #[test]
    fn traffic_header_and_rounding() {
        let rows = vec![TrafficRow::new(ts(0), "orders-api", "us-east", 131.2789)];
        let mut buf = Vec::new();
        write_traffic(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("ts,service,region,rps\n"));
        assert!(text.contains("2025-03-01T09:00:00Z,orders-api,us-east,131.28"));
    }

    #[test]
    fn errors_round_trip_keeps_counts() {
        let rows = vec![ErrorRow::new(ts(0), "orders-api", "eu-west", 0.012_345_6, 73)];
        let mut buf = Vec::new();
        write_errors(&mut buf, &rows).unwrap();
        let loaded = read_errors(buf.as_slice()).unwrap();

        assert_eq!(loaded[0].errors_per_minute, 73);
        assert!((loaded[0].error_rate - 0.012_35).abs() < 1e-9);
    }

    #[test]
    fn latency_round_trip_preserves_order() {
        let rows = vec![LatencyRow::new(
            ts(0),
            "orders-api",
            "us-west",
            101.123,
            212.456,
            388.789,
        )];
        let mut buf = Vec::new();
        write_latency(&mut buf, &rows).unwrap();
        let loaded = read_latency(buf.as_slice()).unwrap();

        assert!(loaded[0].p50_ms <= loaded[0].p95_ms);
        assert!(loaded[0].p95_ms <= loaded[0].p99_ms);
        assert!((loaded[0].p50_ms - 101.12).abs() < 1e-9);
    }

    #[test]
    fn incident_round_trip() {
        let record = IncidentRecord {
            service: "orders-api".to_string(),
            incident_name: "INC-001: latency + errors during peak traffic".to_string(),
            start_ts: ts(0),
            end_ts: ts(30),
            summary: "Traffic spike coincides with elevated tail latency and higher error rates."
                .to_string(),
            suspected_cause: "Capacity saturation and downstream dependency slowness (synthetic)."
                .to_string(),
        };

        let mut buf = Vec::new();
        write_incidents(&mut buf, std::slice::from_ref(&record)).unwrap();
        let loaded = read_incidents(buf.as_slice()).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0], record);
    }

    #[test]
    fn slo_round_trip_full_precision() {
        let row = SloRow {
            ts: ts(0),
            service: "orders-api".to_string(),
            rps: 312.7,
            requests_per_minute: 18_762.0,
            errors_per_minute: 19,
            error_rate: 0.001_012_685,
            availability: 0.998_987_315,
            burn_rate_1h: 1.012_685,
        };

        let mut buf = Vec::new();
        write_slo(&mut buf, std::slice::from_ref(&row)).unwrap();
        let loaded = read_slo(buf.as_slice()).unwrap();

        assert_eq!(loaded[0], row);
    }

    #[test]
    fn empty_tables_are_rejected() {
        let header_only = "ts,service,region,rps\n";
        let err = read_traffic(header_only.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Empty("traffic")));

        let err = read_errors("ts,service,region,error_rate,errors_per_minute\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, Error::Empty("errors")));
    }

    #[test]
    fn malformed_timestamp_names_the_table() {
        let bad = "ts,service,region,rps\nnot-a-time,orders-api,us-east,100.0\n";
        let err = read_traffic(bad.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("traffic"));
        assert!(err.to_string().contains("not-a-time"));
    }

    #[test]
    fn missing_column_is_rejected() {
        let bad = "ts,service,region\n2025-03-01T09:00:00Z,orders-api,us-east\n";
        let err = read_traffic(bad.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Load { table: "traffic", .. }));
    }

    #[test]
    fn rounding_precision() {
        assert!((round_dp(131.2789, 2) - 131.28).abs() < 1e-9);
        assert!((round_dp(0.012_345_6, 5) - 0.012_35).abs() < 1e-12);
        assert!((round_dp(5.0, 2) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn store_persists_and_reloads_a_pass() {
        let dir = std::env::temp_dir().join(format!("mirage-store-{}", std::process::id()));
        let store = CsvStore::new(&dir);

        let dataset = Dataset {
            traffic: vec![TrafficRow::new(ts(0), "orders-api", "us-east", 120.0)],
            errors: vec![ErrorRow::new(ts(0), "orders-api", "us-east", 0.01, 72)],
            latency: vec![LatencyRow::new(ts(0), "orders-api", "us-east", 90.0, 190.0, 340.0)],
            incident: IncidentRecord {
                service: "orders-api".to_string(),
                incident_name: "INC-001".to_string(),
                start_ts: ts(0),
                end_ts: ts(30),
                summary: "spike".to_string(),
                suspected_cause: "saturation".to_string(),
            },
        };

        let written = store.persist(&dataset).unwrap();
        assert_eq!(written.len(), 4);
        assert!(store.table_path(TRAFFIC_FILE).exists());
        assert!(!store.table_path("traffic.csv.tmp").exists());

        let traffic = store.load_traffic().unwrap();
        let errors = store.load_errors().unwrap();
        assert_eq!(traffic.len(), 1);
        assert_eq!(errors[0].errors_per_minute, 72);

        let slo_path = store
            .persist_slo(&[SloRow {
                ts: ts(0),
                service: "orders-api".to_string(),
                rps: 120.0,
                requests_per_minute: 7200.0,
                errors_per_minute: 72,
                error_rate: 0.01,
                availability: 0.99,
                burn_rate_1h: 0.0,
            }])
            .unwrap();
        assert!(slo_path.exists());
        assert_eq!(store.load_slo().unwrap().len(), 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn failed_stage_commits_nothing() {
        let dir = std::env::temp_dir().join(format!("mirage-stage-fail-{}", std::process::id()));
        let store = CsvStore::new(&dir);
        // A directory squatting on the errors staging path fails that
        // stage after traffic has already been staged.
        std::fs::create_dir_all(store.table_path("errors.csv.tmp")).unwrap();

        let dataset = Dataset {
            traffic: vec![TrafficRow::new(ts(0), "orders-api", "us-east", 120.0)],
            errors: vec![ErrorRow::new(ts(0), "orders-api", "us-east", 0.01, 72)],
            latency: vec![LatencyRow::new(ts(0), "orders-api", "us-east", 90.0, 190.0, 340.0)],
            incident: IncidentRecord {
                service: "orders-api".to_string(),
                incident_name: "INC-001".to_string(),
                start_ts: ts(0),
                end_ts: ts(30),
                summary: "spike".to_string(),
                suspected_cause: "saturation".to_string(),
            },
        };

        let err = store.persist(&dataset).unwrap_err();
        assert!(matches!(err, Error::Io(_)));

        assert!(!store.table_path(TRAFFIC_FILE).exists());
        assert!(!store.table_path(ERRORS_FILE).exists());
        assert!(!store.table_path(LATENCY_FILE).exists());
        assert!(!store.table_path(INCIDENTS_FILE).exists());
        assert!(!store.table_path("traffic.csv.tmp").exists());
        assert!(!store.table_path("latency.csv.tmp").exists());
        assert!(!store.table_path("incidents.csv.tmp").exists());
        assert!(store.table_path("errors.csv.tmp").is_dir());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_names_the_table() {
        let store = CsvStore::new("/nonexistent/mirage-test-dir");
        let err = store.load_traffic().unwrap_err();
        assert!(err.to_string().contains("traffic"));
    }
}
