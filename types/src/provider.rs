//! Boundary to the external wallet / donation-contract provider.
//!
//! The ledger never implements a wallet. It talks to one through
//! [`WalletProvider`], which production code backs with a JSON-RPC endpoint
//! and tests back with a scripted nullable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::WalletAddress;

/// Failures reported by a wallet provider. None of them are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("no wallet provider available")]
    ProviderAbsent,

    #[error("request rejected by user")]
    UserRejected,

    #[error("network error: {0}")]
    Network(String),

    #[error("provider error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("unexpected provider response: {0}")]
    InvalidResponse(String),

    #[error("transaction {0} reverted")]
    Reverted(String),

    #[error("transaction {hash} not confirmed after {attempts} attempts")]
    ConfirmationTimeout { hash: String, attempts: u32 },

    #[error("operation not supported by this provider: {0}")]
    Unsupported(&'static str),
}

/// A payment the donor asks the wallet to sign and submit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub from: WalletAddress,
    pub to: WalletAddress,
    pub value_wei: u128,
    pub message: String,
    pub keyword: String,
}

/// Handle to a submitted, possibly unconfirmed, transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxHandle {
    pub hash: String,
}

/// Proof that a submitted transaction was mined successfully.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub hash: String,
    pub block_number: Option<u64>,
}

/// One donation as recorded by the on-chain contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnChainRecord {
    pub receiver: String,
    pub sender: String,
    pub amount_wei: u128,
    pub message: String,
    pub keyword: String,
    pub timestamp_secs: u64,
}

/// Wallet and donation-contract capability.
///
/// Every operation is asynchronous and may fail independently; callers must
/// not assume the provider is available.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts already authorised for this application, without prompting.
    async fn accounts(&self) -> Result<Vec<WalletAddress>, ProviderError>;

    /// Ask the user to authorise accounts.
    async fn request_accounts(&self) -> Result<Vec<WalletAddress>, ProviderError>;

    /// Sign and submit a payment.
    async fn send_payment(&self, request: &PaymentRequest) -> Result<TxHandle, ProviderError>;

    /// Wait until the transaction is mined.
    async fn wait_for_confirmation(&self, handle: &TxHandle)
        -> Result<Confirmation, ProviderError>;

    /// All donations recorded by the contract.
    async fn read_all_on_chain_records(&self) -> Result<Vec<OnChainRecord>, ProviderError>;

    /// Number of donations recorded by the contract.
    async fn on_chain_record_count(&self) -> Result<u64, ProviderError>;
}
