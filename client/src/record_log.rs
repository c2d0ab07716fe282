//! Access to the record store from the client side.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use charity_store::RecordStore;
use charity_types::TransactionRecord;
use serde::Deserialize;

use crate::error::ClientError;

/// Append / list access to a record store, local or remote.
#[async_trait]
pub trait RecordLog: Send + Sync {
    /// Persist one record. Succeeds only once the store acknowledged the write.
    async fn append(&self, record: &TransactionRecord) -> Result<(), ClientError>;

    /// Every stored record, in insertion order.
    async fn list_all(&self) -> Result<Vec<TransactionRecord>, ClientError>;
}

// ── RecordStoreClient ───────────────────────────────────────────────────

/// HTTP client for a record store server.
///
/// Wraps `reqwest::Client` with the server's base URL and speaks the
/// `/transactions` protocol.
#[derive(Clone)]
pub struct RecordStoreClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct Ack {
    success: bool,
    message: String,
}

impl RecordStoreClient {
    /// Create a client targeting the given base URL (e.g. `http://127.0.0.1:5004`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ClientError::Http(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// The configured server URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transactions_url(&self) -> String {
        format!("{}/transactions", self.base_url)
    }
}

#[async_trait]
impl RecordLog for RecordStoreClient {
    async fn append(&self, record: &TransactionRecord) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.transactions_url())
            .json(record)
            .send()
            .await
            .map_err(|e| ClientError::Http(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Http(format!("failed to read response: {e}")))?;
        let ack = serde_json::from_slice::<Ack>(&body);

        if status.is_success() {
            let ack = ack.map_err(|e| ClientError::Http(format!("invalid JSON response: {e}")))?;
            if ack.success {
                return Ok(());
            }
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message: ack.message,
            });
        }

        // Failures from outside the record store (body limit, proxies) carry no ack.
        let message = match ack {
            Ok(ack) => ack.message,
            Err(_) => {
                let text = String::from_utf8_lossy(&body).trim().to_string();
                if text.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    text
                }
            }
        };
        Err(ClientError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn list_all(&self) -> Result<Vec<TransactionRecord>, ClientError> {
        let response = self
            .http
            .get(self.transactions_url())
            .send()
            .await
            .map_err(|e| ClientError::Http(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ClientError::Store(format!(
                "record store returned HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Http(format!("invalid JSON response: {e}")))
    }
}

// ── LocalRecordLog ──────────────────────────────────────────────────────

/// In-process access to a [`RecordStore`]; store calls run on the blocking pool.
pub struct LocalRecordLog<S> {
    store: Arc<S>,
}

impl<S: RecordStore + 'static> LocalRecordLog<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

#[async_trait]
impl<S: RecordStore + 'static> RecordLog for LocalRecordLog<S> {
    async fn append(&self, record: &TransactionRecord) -> Result<(), ClientError> {
        let store = Arc::clone(&self.store);
        let record = record.clone();
        tokio::task::spawn_blocking(move || store.append(&record))
            .await
            .map_err(|e| ClientError::Store(format!("append task failed: {e}")))??;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<TransactionRecord>, ClientError> {
        let store = Arc::clone(&self.store);
        let records = tokio::task::spawn_blocking(move || store.list_all())
            .await
            .map_err(|e| ClientError::Store(format!("list task failed: {e}")))??;
        Ok(records)
    }
}
