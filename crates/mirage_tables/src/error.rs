//! Error types for table storage.

use thiserror::Error;

/// Errors that can occur while loading or persisting tables.
#[derive(Debug, Error)]
pub enum Error {
    /// A table failed to load or parse.
    #[error("failed to load {table} table: {message}")]
    Load {
        /// The table that failed.
        table: &'static str,
        /// Description of the failure.
        message: String,
    },

    /// A table was present but held no data rows.
    #[error("{0} table is empty")]
    Empty(&'static str),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// CSV serialization error.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Creates a load error for the given table.
    pub fn load(table: &'static str, message: impl Into<String>) -> Self {
        Self::Load {
            table,
            message: message.into(),
        }
    }
}

/// Result type alias for table operations.
pub type Result<T> = std::result::Result<T, Error>;
