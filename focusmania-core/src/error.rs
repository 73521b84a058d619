//! Error types for focusmania-core

use thiserror::Error;

/// Main error type for the focusmania-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed task log
    #[error("parse error at line {line}: {message}")]
    Parse { line: u64, message: String },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Candidate references a category never seen in history
    #[error("unknown category: {0:?}")]
    UnknownCategory(String),

    /// Training labels hold fewer than two distinct outcomes
    #[error("training set needs both outcomes, found {distinct} distinct label(s) in {rows} row(s)")]
    EmptyTrainingSet { distinct: usize, rows: usize },

    /// Malformed feature input (e.g. non-positive time spent)
    #[error("invalid feature: {0}")]
    InvalidFeature(String),
}

/// Result type alias for focusmania-core
pub type Result<T> = std::result::Result<T, Error>;
