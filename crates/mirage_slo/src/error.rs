//! Error types for SLO analysis.

use thiserror::Error;

/// Errors surfaced while configuring or running the analyzer.
#[derive(Debug, Error)]
pub enum Error {
    /// The analyzer configuration is out of bounds.
    #[error("invalid SLO configuration: {0}")]
    InvalidConfig(String),

    /// The input tables cannot be analyzed.
    #[error("invalid input data: {0}")]
    InvalidData(String),
}

/// Convenience alias for analysis results.
pub type Result<T> = std::result::Result<T, Error>;
