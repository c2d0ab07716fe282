//! Record-level error type shared across crates.

use thiserror::Error;

/// Reasons a value cannot be accepted as a transaction or donation record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record body is absent")]
    Absent,

    #[error("record must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("record has no fields")]
    Empty,

    #[error("malformed JSON: {0}")]
    Malformed(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("field {field} must be a string")]
    InvalidField { field: &'static str },

    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),
}
