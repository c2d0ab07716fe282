//! Nullable wallet provider — a scripted wallet for testing donation flows.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use charity_types::{
    Confirmation, OnChainRecord, PaymentRequest, ProviderError, TxHandle, WalletAddress,
    WalletProvider,
};

/// A wallet provider whose answers are set up in advance.
///
/// By default it has no authorised accounts, accepts every payment with a
/// deterministic hash (`0x…01`, `0x…02`, …) and confirms it immediately.
/// Every payment request it receives is recorded for inspection.
pub struct NullWalletProvider {
    authorised: Mutex<Vec<WalletAddress>>,
    grantable: Mutex<Vec<WalletAddress>>,
    payment_outcomes: Mutex<VecDeque<Result<(), ProviderError>>>,
    confirmation_outcomes: Mutex<VecDeque<Result<(), ProviderError>>>,
    on_chain: Mutex<Result<Vec<OnChainRecord>, ProviderError>>,
    sent: Mutex<Vec<PaymentRequest>>,
}

impl NullWalletProvider {
    pub fn new() -> Self {
        Self {
            authorised: Mutex::new(Vec::new()),
            grantable: Mutex::new(Vec::new()),
            payment_outcomes: Mutex::new(VecDeque::new()),
            confirmation_outcomes: Mutex::new(VecDeque::new()),
            on_chain: Mutex::new(Ok(Vec::new())),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// A provider where `account` is already authorised.
    pub fn with_account(account: WalletAddress) -> Self {
        let provider = Self::new();
        provider.authorised.lock().unwrap().push(account);
        provider
    }

    /// Accounts the user will grant on the next `request_accounts`.
    pub fn grant_on_request(&self, accounts: Vec<WalletAddress>) {
        *self.grantable.lock().unwrap() = accounts;
    }

    /// Queue the outcome of the next `send_payment` call.
    pub fn push_payment_outcome(&self, outcome: Result<(), ProviderError>) {
        self.payment_outcomes.lock().unwrap().push_back(outcome);
    }

    /// Queue the outcome of the next `wait_for_confirmation` call.
    pub fn push_confirmation_outcome(&self, outcome: Result<(), ProviderError>) {
        self.confirmation_outcomes.lock().unwrap().push_back(outcome);
    }

    /// Set what `read_all_on_chain_records` returns.
    pub fn set_on_chain_records(&self, records: Result<Vec<OnChainRecord>, ProviderError>) {
        *self.on_chain.lock().unwrap() = records;
    }

    /// Payments submitted so far, in order.
    pub fn sent_payments(&self) -> Vec<PaymentRequest> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for NullWalletProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn fake_hash(n: usize) -> String {
    format!("0x{n:064x}")
}

#[async_trait]
impl WalletProvider for NullWalletProvider {
    async fn accounts(&self) -> Result<Vec<WalletAddress>, ProviderError> {
        Ok(self.authorised.lock().unwrap().clone())
    }

    async fn request_accounts(&self) -> Result<Vec<WalletAddress>, ProviderError> {
        let granted = std::mem::take(&mut *self.grantable.lock().unwrap());
        let mut authorised = self.authorised.lock().unwrap();
        for account in granted {
            if !authorised.contains(&account) {
                authorised.push(account);
            }
        }
        if authorised.is_empty() {
            return Err(ProviderError::UserRejected);
        }
        Ok(authorised.clone())
    }

    async fn send_payment(&self, request: &PaymentRequest) -> Result<TxHandle, ProviderError> {
        if let Some(Err(e)) = self.payment_outcomes.lock().unwrap().pop_front() {
            return Err(e);
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(request.clone());
        Ok(TxHandle {
            hash: fake_hash(sent.len()),
        })
    }

    async fn wait_for_confirmation(
        &self,
        handle: &TxHandle,
    ) -> Result<Confirmation, ProviderError> {
        if let Some(Err(e)) = self.confirmation_outcomes.lock().unwrap().pop_front() {
            return Err(e);
        }
        Ok(Confirmation {
            hash: handle.hash.clone(),
            block_number: Some(1),
        })
    }

    async fn read_all_on_chain_records(&self) -> Result<Vec<OnChainRecord>, ProviderError> {
        self.on_chain.lock().unwrap().clone()
    }

    async fn on_chain_record_count(&self) -> Result<u64, ProviderError> {
        self.on_chain
            .lock()
            .unwrap()
            .as_ref()
            .map(|records| records.len() as u64)
            .map_err(Clone::clone)
    }
}
