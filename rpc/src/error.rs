//! RPC error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use charity_store::StoreError;
use thiserror::Error;

use crate::handlers::AckResponse;

pub const MSG_INVALID: &str = "Invalid transaction data.";
pub const MSG_SAVE_FAILED: &str = "Failed to save transaction.";
pub const MSG_LOAD_FAILED: &str = "Failed to load transactions.";

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("save failed: {0}")]
    SaveFailed(String),

    #[error("load failed: {0}")]
    LoadFailed(String),

    #[error("server error: {0}")]
    Server(String),
}

impl RpcError {
    pub fn status(&self) -> StatusCode {
        match self {
            RpcError::InvalidTransaction(_) => StatusCode::BAD_REQUEST,
            RpcError::SaveFailed(_) | RpcError::LoadFailed(_) | RpcError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The message shown to HTTP clients. Internal detail stays in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            RpcError::InvalidTransaction(_) => MSG_INVALID,
            RpcError::SaveFailed(_) | RpcError::Server(_) => MSG_SAVE_FAILED,
            RpcError::LoadFailed(_) => MSG_LOAD_FAILED,
        }
    }
}

/// Append-side mapping: anything but bad input means the record was not saved.
impl From<StoreError> for RpcError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidInput(reason) => RpcError::InvalidTransaction(reason.to_string()),
            other => RpcError::SaveFailed(other.to_string()),
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let body = AckResponse::failure(self.public_message());
        (self.status(), Json(body)).into_response()
    }
}
