use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("unknown entity class: {0}")]
    UnknownClass(String),

    #[error("entity kind mismatch: expected {expected}, got {actual}")]
    KindMismatch { expected: String, actual: String },
}
