//! Error types for model construction and persistence.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while building or persisting the time-series table.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Frame index went backwards: got {frame}, last appended {last}")]
    NonMonotonicFrame { frame: u64, last: u64 },

    #[error("Face id gap in frame {frame}: expected {expected}, got {got}")]
    FaceIdGap { frame: u64, expected: u32, got: u32 },

    #[error("Table has no rows")]
    EmptyTable,

    #[error("Unrecognized column in table file: {0}")]
    UnrecognizedColumn(String),

    #[error("Invalid value in column {column}, row {row}: {value}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
