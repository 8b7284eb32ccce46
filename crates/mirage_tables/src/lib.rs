//! Table model and CSV storage for Mirage.
//!
//! This crate provides:
//! - Row types for the five Mirage tables
//! - Minute-resolution time indexing and the region fleet
//! - Dataset container with a determinism fingerprint
//! - CSV persistence with staged, all-or-nothing writes
//!
//! # Example
//!
//! ```rust,ignore
//! use mirage_tables::CsvStore;
//!
//! let store = CsvStore::new("out");
//! let paths = store.persist(&dataset)?;
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod dataset;
pub mod error;
pub mod index;
pub mod region;
pub mod row;
pub mod store;

pub use dataset::{Dataset, DatasetSummary};
pub use error::{Error, Result};
pub use index::TimeIndex;
pub use region::Region;
pub use row::{ErrorRow, IncidentRecord, LatencyRow, SloRow, TrafficRow};
pub use store::CsvStore;
