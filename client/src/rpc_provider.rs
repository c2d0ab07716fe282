//! Wallet provider backed by an Ethereum-style JSON-RPC endpoint.
//!
//! Covers the account and payment methods a browser wallet exposes
//! (`eth_accounts`, `eth_requestAccounts`, `eth_sendTransaction`,
//! `eth_getTransactionReceipt`). Reading the donation contract needs its ABI
//! and is not supported here.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use charity_types::{
    Confirmation, OnChainRecord, PaymentRequest, ProviderError, TxHandle, WalletAddress,
    WalletProvider,
};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::amount::{parse_hex_quantity, to_hex_quantity};

/// Gas limit of a plain value transfer.
pub const TRANSFER_GAS: u64 = 21_000;

/// EIP-1193 code for "user rejected the request".
const USER_REJECTED_CODE: i64 = 4001;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_MAX_POLLS: u32 = 90;

pub struct JsonRpcWalletProvider {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
    poll_interval: Duration,
    max_polls: u32,
}

impl JsonRpcWalletProvider {
    /// Create a provider targeting the given endpoint (e.g. `http://127.0.0.1:8545`).
    pub fn new(url: impl Into<String>) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ProviderError::Network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        })
    }

    /// Override how often and how many times receipts are polled.
    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls.max(1);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a JSON-RPC request and return the `result` field.
    async fn call(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ProviderError::ProviderAbsent
                } else {
                    ProviderError::Network(format!("{method} failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            return Err(ProviderError::Network(format!(
                "{method}: provider returned HTTP {}",
                response.status()
            )));
        }

        let mut json: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("{method}: {e}")))?;

        if let Some(err) = json.get("error").filter(|e| !e.is_null()) {
            let code = err.get("code").and_then(Value::as_i64).unwrap_or_default();
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(if code == USER_REJECTED_CODE {
                ProviderError::UserRejected
            } else {
                ProviderError::Rpc { code, message }
            });
        }

        Ok(json.get_mut("result").map(Value::take).unwrap_or(Value::Null))
    }

    async fn account_list(&self, method: &str) -> Result<Vec<WalletAddress>, ProviderError> {
        let result = self.call(method, json!([])).await?;
        let entries = result
            .as_array()
            .ok_or_else(|| ProviderError::InvalidResponse(format!("{method}: expected array")))?;
        entries
            .iter()
            .map(|v| {
                v.as_str()
                    .ok_or_else(|| ProviderError::InvalidResponse(format!("{method}: non-string account")))
                    .and_then(|s| {
                        WalletAddress::parse(s)
                            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
                    })
            })
            .collect()
    }
}

#[async_trait]
impl WalletProvider for JsonRpcWalletProvider {
    async fn accounts(&self) -> Result<Vec<WalletAddress>, ProviderError> {
        self.account_list("eth_accounts").await
    }

    async fn request_accounts(&self) -> Result<Vec<WalletAddress>, ProviderError> {
        self.account_list("eth_requestAccounts").await
    }

    /// Submits a plain value transfer. `message` and `keyword` are recorded by
    /// the donation contract, not by the transfer itself.
    async fn send_payment(&self, request: &PaymentRequest) -> Result<TxHandle, ProviderError> {
        let params = json!([{
            "from": request.from.as_str(),
            "to": request.to.as_str(),
            "gas": to_hex_quantity(u128::from(TRANSFER_GAS)),
            "value": to_hex_quantity(request.value_wei),
        }]);
        let result = self.call("eth_sendTransaction", params).await?;
        let hash = result
            .as_str()
            .ok_or_else(|| ProviderError::InvalidResponse("eth_sendTransaction: expected hash".into()))?
            .to_string();
        info!("transaction submitted - {hash}");
        Ok(TxHandle { hash })
    }

    async fn wait_for_confirmation(
        &self,
        handle: &TxHandle,
    ) -> Result<Confirmation, ProviderError> {
        for attempt in 1..=self.max_polls {
            let receipt = self
                .call("eth_getTransactionReceipt", json!([handle.hash]))
                .await?;
            if receipt.is_null() {
                debug!(hash = %handle.hash, attempt, "receipt not yet available");
                if attempt < self.max_polls {
                    tokio::time::sleep(self.poll_interval).await;
                }
                continue;
            }

            let status = receipt.get("status").and_then(Value::as_str);
            if status.and_then(parse_hex_quantity) == Some(0) {
                return Err(ProviderError::Reverted(handle.hash.clone()));
            }
            let block_number = receipt
                .get("blockNumber")
                .and_then(Value::as_str)
                .and_then(parse_hex_quantity)
                .and_then(|n| u64::try_from(n).ok());
            info!("transaction confirmed - {}", handle.hash);
            return Ok(Confirmation {
                hash: handle.hash.clone(),
                block_number,
            });
        }
        Err(ProviderError::ConfirmationTimeout {
            hash: handle.hash.clone(),
            attempts: self.max_polls,
        })
    }

    async fn read_all_on_chain_records(&self) -> Result<Vec<OnChainRecord>, ProviderError> {
        Err(ProviderError::Unsupported("reading donation contract records"))
    }

    async fn on_chain_record_count(&self) -> Result<u64, ProviderError> {
        Err(ProviderError::Unsupported("reading donation contract count"))
    }
}
