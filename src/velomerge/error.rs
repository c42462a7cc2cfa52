//! Error types for the merge pipeline
//!
//! Every failure the core can surface falls into one of three buckets:
//! the input could not be read, a record is missing its join key, or the
//! output rejected a write. None of them are retried.

use thiserror::Error;

/// Result alias used throughout the merge pipeline
pub type MergeResult<T> = Result<T, MergeError>;

/// Errors raised while building the lookup table or streaming the join
#[derive(Debug, Error)]
pub enum MergeError {
    /// Input cannot be opened or read
    #[error("Source '{source_name}' unavailable: {message}")]
    SourceUnavailable {
        source_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A record lacks the column used as join key
    #[error("Malformed record at row {row} of '{source_name}': missing key column '{key_column}'")]
    MalformedRecord {
        source_name: String,
        row: u64,
        key_column: String,
    },

    /// Output cannot be written or finalized
    #[error("Sink '{sink_name}' unavailable: {message}")]
    SinkUnavailable {
        sink_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation not allowed in the joiner's current state
    #[error("Invalid joiner state: {message}")]
    InvalidState { message: String },
}

impl MergeError {
    pub fn source_unavailable<E>(source_name: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        MergeError::SourceUnavailable {
            source_name: source_name.into(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    pub fn sink_unavailable<E>(sink_name: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        MergeError::SinkUnavailable {
            sink_name: sink_name.into(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    pub fn malformed(source_name: impl Into<String>, row: u64, key_column: &str) -> Self {
        MergeError::MalformedRecord {
            source_name: source_name.into(),
            row,
            key_column: key_column.to_string(),
        }
    }

    /// Short category name, used by the CLI when reporting failures
    pub fn kind(&self) -> &'static str {
        match self {
            MergeError::SourceUnavailable { .. } => "SourceUnavailable",
            MergeError::MalformedRecord { .. } => "MalformedRecord",
            MergeError::SinkUnavailable { .. } => "SinkUnavailable",
            MergeError::InvalidState { .. } => "InvalidState",
        }
    }
}
