//! Error types for synthesis configuration.

use thiserror::Error;

/// Errors that can occur while configuring a synthesis run.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration violates a structural bound.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The incident window does not fit the horizon.
    #[error("invalid incident window: {0}")]
    InvalidIncident(String),
}

/// Result type alias for synthesis operations.
pub type Result<T> = std::result::Result<T, Error>;
