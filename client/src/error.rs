use charity_types::{ProviderError, RecordError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("wallet provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("no wallet account connected")]
    NotConnected,

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid record: {0}")]
    InvalidRecord(#[from] RecordError),

    #[error("record store rejected the request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("record store error: {0}")]
    Store(String),

    #[error("donation {hash} confirmed on chain but not recorded: {reason}")]
    RecordNotSaved { hash: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<charity_store::StoreError> for ClientError {
    fn from(e: charity_store::StoreError) -> Self {
        match e {
            charity_store::StoreError::InvalidInput(reason) => ClientError::InvalidRecord(reason),
            other => ClientError::Store(other.to_string()),
        }
    }
}
