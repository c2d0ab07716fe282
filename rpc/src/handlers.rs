//! Request handlers for the `/transactions` resource.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use charity_store::RecordStore;
use charity_types::TransactionRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::RpcError;
use crate::server::RpcState;

pub const MSG_SAVED: &str = "Transaction saved.";

// ── Responses ────────────────────────────────────────────────────────────

/// Acknowledgement body for appends and for every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    pub message: String,
}

impl AckResponse {
    pub fn saved() -> Self {
        Self {
            success: true,
            message: MSG_SAVED.to_string(),
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
        }
    }
}

/// What `GET /transactions` answers when the store cannot be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadFailurePolicy {
    /// Log the error and answer `200 []`.
    #[default]
    FailOpen,
    /// Answer `500` with a failure acknowledgement.
    FailClosed,
}

impl ReadFailurePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ReadFailurePolicy::FailOpen => "fail_open",
            ReadFailurePolicy::FailClosed => "fail_closed",
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────

/// `POST /transactions`
///
/// The body is parsed as JSON whatever its content type. It must be a
/// non-empty object (and, in strict mode, carry the donation fields). The
/// success acknowledgement is only sent after the store reports the write
/// durable.
pub async fn save_transaction(
    State(state): State<Arc<RpcState>>,
    body: Bytes,
) -> Result<Json<AckResponse>, RpcError> {
    let record = TransactionRecord::from_slice(&body)
        .map_err(|e| RpcError::InvalidTransaction(e.to_string()))
        .and_then(|r| state.validation.check(r).map_err(RpcError::from));
    let record = match record {
        Ok(r) => r,
        Err(e) => {
            debug!(error = %e, "rejected transaction");
            return Err(e);
        }
    };

    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || store.append(&record))
        .await
        .map_err(|e| RpcError::Server(format!("append task failed: {e}")))?
        .map_err(|e| {
            error!(error = %e, "transaction not saved");
            RpcError::from(e)
        })?;

    Ok(Json(AckResponse::saved()))
}

/// `GET /transactions`
pub async fn list_transactions(
    State(state): State<Arc<RpcState>>,
) -> Result<Json<Vec<TransactionRecord>>, RpcError> {
    let store = Arc::clone(&state.store);
    let loaded = match tokio::task::spawn_blocking(move || store.list_all()).await {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(e) => Err(format!("list task failed: {e}")),
    };

    match loaded {
        Ok(records) => Ok(Json(records)),
        Err(e) => match state.read_failure {
            ReadFailurePolicy::FailOpen => {
                warn!(error = %e, "could not read transactions, answering with an empty list");
                Ok(Json(Vec::new()))
            }
            ReadFailurePolicy::FailClosed => {
                error!(error = %e, "could not read transactions");
                Err(RpcError::LoadFailed(e))
            }
        },
    }
}
