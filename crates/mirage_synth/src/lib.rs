//! Synthetic service telemetry generation.
//!
//! This crate produces deterministic per-minute telemetry for a
//! fictitious service fleet:
//!
//! - a daily seasonality curve shared by traffic and latency
//! - Gaussian and Beta noise drawn from one seeded ChaCha stream
//! - exactly one injected incident that raises traffic, error rate,
//!   and latency tails inside its window
//! - per-region perturbation with fixed latency biases
//!
//! The entry point is [`synthesize`], which validates a [`SynthConfig`]
//! and returns a [`mirage_tables::Dataset`] ready for persistence.
//!
//! ```rust,ignore
//! let config = SynthConfig::default().with_minutes(1440).with_seed(7);
//! let dataset = mirage_synth::synthesize(config)?;
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod error;
pub mod incident;
pub mod seasonality;
pub mod synth;

pub use config::SynthConfig;
pub use error::{Error, Result};
pub use incident::IncidentWindow;
pub use seasonality::DailyCycle;
pub use synth::{synthesize, Synthesizer};
