use charity_types::RecordError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] RecordError),

    #[error("storage read failed: {0}")]
    Read(String),

    #[error("stored data is corrupted: {0}")]
    Corrupted(String),

    #[error("storage write failed: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Whether the caller supplied a bad record (as opposed to a storage fault).
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, StoreError::InvalidInput(_))
    }

    /// Whether the failure happened while loading the stored sequence.
    pub fn is_read_failure(&self) -> bool {
        matches!(self, StoreError::Read(_) | StoreError::Corrupted(_))
    }
}
