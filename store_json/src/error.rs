use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonStoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} does not hold a JSON array of records: {reason}")]
    Corrupted { path: PathBuf, reason: String },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<JsonStoreError> for charity_store::StoreError {
    fn from(e: JsonStoreError) -> Self {
        use charity_store::StoreError;
        match e {
            JsonStoreError::Read { .. } => StoreError::Read(e.to_string()),
            JsonStoreError::Corrupted { .. } => StoreError::Corrupted(e.to_string()),
            JsonStoreError::Write { .. } => StoreError::Write(e.to_string()),
            JsonStoreError::Serialize(_) => StoreError::Serialization(e.to_string()),
        }
    }
}
