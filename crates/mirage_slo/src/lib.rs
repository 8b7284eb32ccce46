//! SLO error-budget analysis for Mirage telemetry.
//!
//! Given the traffic and errors tables, this crate:
//!
//! - collapses regional rows into per-service minutes
//! - recomputes the observed error rate from counts and volume
//! - derives availability and a rolling burn rate against the
//!   configured error budget
//!
//! The entry point is [`Analyzer`]:
//!
//! ```rust,ignore
//! let analyzer = Analyzer::new(SloConfig::default())?;
//! let report = analyzer.analyze(&traffic, &errors)?;
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod aggregate;
pub mod analyzer;
pub mod burn;
pub mod config;
pub mod error;

pub use aggregate::{join_minutes, ServiceMinute};
pub use analyzer::{Analyzer, SloReport, SloSummary};
pub use burn::RollingMean;
pub use config::{JoinPolicy, SloConfig};
pub use error::{Error, Result};
