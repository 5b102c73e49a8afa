//! Error types for CSV reading

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for csvrecords operations
pub type Result<T> = std::result::Result<T, CsvError>;

/// Errors that can occur while configuring or reading a CSV file
///
/// Malformed quoting inside a line is not an error: the parser recovers
/// the best-effort field content instead (see [`crate::csv::CsvParser`]).
#[derive(Debug, Error)]
pub enum CsvError {
    /// The path given at construction does not exist
    #[error("{} not found", .path.display())]
    ResourceNotFound { path: PathBuf },

    /// Delimiter, enclosure or escape is not exactly one character, or the
    /// delimiter clashes with the enclosure or escape
    #[error("invalid {field} {value:?}: {reason}")]
    InvalidConfiguration {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    /// A read operation was attempted after the session was closed
    #[error("session is closed")]
    SessionClosed,

    /// I/O error from the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CsvError {
    pub(crate) fn invalid_configuration(
        field: &'static str,
        value: &str,
        reason: &'static str,
    ) -> Self {
        CsvError::InvalidConfiguration {
            field,
            value: value.to_string(),
            reason,
        }
    }
}
