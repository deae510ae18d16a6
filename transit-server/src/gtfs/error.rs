//! Data-access error types.

use std::path::PathBuf;

use crate::domain::DomainError;

/// Errors from loading or reading the schedule dataset.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// A feed file could not be opened or read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A feed file is not valid CSV or a record does not match its header
    #[error("malformed CSV in {file}: {source}")]
    Csv {
        file: &'static str,
        #[source]
        source: csv::Error,
    },

    /// A record parsed as CSV but holds an unusable value
    #[error("invalid record in {file} at line {line}: {reason}")]
    InvalidRecord {
        file: &'static str,
        line: u64,
        reason: String,
    },

    /// Records are individually valid but inconsistent with each other
    #[error("inconsistent dataset: {0}")]
    Inconsistent(#[from] DomainError),
}
