//! The donation flow: connect a wallet, pay, record the donation.

use std::sync::Arc;

use charity_types::{
    Clock, DonationRecord, PaymentRequest, TransactionRecord, WalletAddress, WalletProvider,
};
use tracing::{info, warn};

use crate::amount::parse_ether;
use crate::display::DisplayDonation;
use crate::error::ClientError;
use crate::record_log::RecordLog;

/// Keyword attached to every donation payment.
pub const DONATION_KEYWORD: &str = "donation";

/// Drives donations from the donor's wallet into the record store.
///
/// A donation is recorded exactly once per confirmed payment. Provider
/// failures abort the flow before anything is recorded and are not retried.
pub struct DonationClient {
    provider: Arc<dyn WalletProvider>,
    log: Arc<dyn RecordLog>,
    clock: Arc<dyn Clock>,
    donation_address: WalletAddress,
    current_account: Option<WalletAddress>,
}

impl DonationClient {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        log: Arc<dyn RecordLog>,
        clock: Arc<dyn Clock>,
        donation_address: WalletAddress,
    ) -> Self {
        Self {
            provider,
            log,
            clock,
            donation_address,
            current_account: None,
        }
    }

    pub fn current_account(&self) -> Option<&WalletAddress> {
        self.current_account.as_ref()
    }

    pub fn donation_address(&self) -> &WalletAddress {
        &self.donation_address
    }

    /// Pick up an already authorised account without prompting the user.
    pub async fn check_connected(&mut self) -> Result<Option<&WalletAddress>, ClientError> {
        let accounts = self.provider.accounts().await?;
        match accounts.into_iter().next() {
            Some(account) => {
                info!(%account, "wallet already connected");
                self.current_account = Some(account);
            }
            None => info!("no connected accounts found"),
        }
        Ok(self.current_account.as_ref())
    }

    /// Ask the wallet to authorise an account and remember the first one.
    pub async fn connect_wallet(&mut self) -> Result<&WalletAddress, ClientError> {
        let accounts = self.provider.request_accounts().await?;
        let account = accounts
            .into_iter()
            .next()
            .ok_or(charity_types::ProviderError::ProviderAbsent)?;
        info!(%account, "wallet connected");
        Ok(self.current_account.insert(account))
    }

    /// Pay `amount_eth` to the donation address and record the donation.
    ///
    /// The record is built from the confirmed transaction and appended once.
    /// If the payment confirmed but the append failed, the error carries the
    /// transaction hash so the caller can re-record it.
    pub async fn donate(
        &self,
        amount_eth: &str,
        message: &str,
    ) -> Result<DonationRecord, ClientError> {
        let from = self.current_account.clone().ok_or(ClientError::NotConnected)?;
        let value_wei = parse_ether(amount_eth)?;

        let request = PaymentRequest {
            from: from.clone(),
            to: self.donation_address.clone(),
            value_wei,
            message: message.to_string(),
            keyword: DONATION_KEYWORD.to_string(),
        };

        info!("sending donation of {} ETH", amount_eth.trim());
        let handle = self.provider.send_payment(&request).await?;
        let confirmation = self.provider.wait_for_confirmation(&handle).await?;

        let donation = DonationRecord {
            tx_hash: confirmation.hash,
            sender: from.to_string(),
            amount: amount_eth.trim().to_string(),
            message: message.to_string(),
            timestamp: self.clock.timestamp(),
        };

        self.save_record(&donation).await.map_err(|e| {
            warn!(hash = %donation.tx_hash, error = %e, "donation confirmed but not recorded");
            ClientError::RecordNotSaved {
                hash: donation.tx_hash.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(donation)
    }

    /// Append a donation to the record store.
    pub async fn save_record(&self, donation: &DonationRecord) -> Result<(), ClientError> {
        let record = TransactionRecord::from(donation.clone());
        self.log.append(&record).await
    }

    /// The stored donation log, in insertion order.
    pub async fn latest_donations(&self) -> Result<Vec<TransactionRecord>, ClientError> {
        self.log.list_all().await
    }

    /// Donations as recorded by the contract, shaped for display.
    pub async fn on_chain_donations(&self) -> Result<Vec<DisplayDonation>, ClientError> {
        let records = self.provider.read_all_on_chain_records().await?;
        Ok(records.iter().map(DisplayDonation::from).collect())
    }

    /// Number of donations recorded by the contract.
    pub async fn transaction_count(&self) -> Result<u64, ClientError> {
        Ok(self.provider.on_chain_record_count().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record_log::LocalRecordLog;
    use charity_nullables::{NullClock, NullRecordStore, NullWalletProvider};
    use charity_types::{OnChainRecord, ProviderError};

    fn addr(n: u8) -> WalletAddress {
        WalletAddress::parse(format!("0x{:040x}", n)).unwrap()
    }

    struct Harness {
        provider: Arc<NullWalletProvider>,
        store: Arc<NullRecordStore>,
        client: DonationClient,
    }

    fn harness(provider: NullWalletProvider) -> Harness {
        let provider = Arc::new(provider);
        let store = Arc::new(NullRecordStore::new());
        let client = DonationClient::new(
            provider.clone(),
            Arc::new(LocalRecordLog::new(store.clone())),
            Arc::new(NullClock::new(1_700_000_000)),
            addr(0xd0),
        );
        Harness {
            provider,
            store,
            client,
        }
    }

    #[tokio::test]
    async fn confirmed_donation_is_recorded_once() {
        let mut h = harness(NullWalletProvider::with_account(addr(1)));
        h.client.check_connected().await.unwrap();

        let donation = h.client.donate("0.5", "hi").await.unwrap();
        assert_eq!(donation.amount, "0.5");
        assert_eq!(donation.message, "hi");
        assert_eq!(donation.sender, addr(1).to_string());
        assert_eq!(donation.timestamp, "2023-11-14T22:13:20Z");

        let stored = h.store.snapshot();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].get_str("txHash"), Some(donation.tx_hash.as_str()));

        let sent = h.provider.sent_payments();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, addr(0xd0));
        assert_eq!(sent[0].value_wei, 500_000_000_000_000_000);
        assert_eq!(sent[0].keyword, DONATION_KEYWORD);
    }

    #[tokio::test]
    async fn donating_requires_a_connected_account() {
        let h = harness(NullWalletProvider::new());
        assert!(matches!(
            h.client.donate("0.5", "hi").await,
            Err(ClientError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn connect_wallet_remembers_first_granted_account() {
        let provider = NullWalletProvider::new();
        provider.grant_on_request(vec![addr(7), addr(8)]);
        let mut h = harness(provider);
        assert_eq!(h.client.connect_wallet().await.unwrap(), &addr(7));
        assert_eq!(h.client.current_account(), Some(&addr(7)));
    }

    #[tokio::test]
    async fn rejected_payment_records_nothing() {
        let provider = NullWalletProvider::with_account(addr(1));
        provider.push_payment_outcome(Err(ProviderError::UserRejected));
        let mut h = harness(provider);
        h.client.check_connected().await.unwrap();

        let err = h.client.donate("0.5", "hi").await.unwrap_err();
        assert!(matches!(err, ClientError::Provider(ProviderError::UserRejected)));
        assert!(h.store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn unconfirmed_payment_records_nothing() {
        let provider = NullWalletProvider::with_account(addr(1));
        provider.push_confirmation_outcome(Err(ProviderError::Reverted("0x01".into())));
        let mut h = harness(provider);
        h.client.check_connected().await.unwrap();

        assert!(h.client.donate("1", "hi").await.is_err());
        assert!(h.store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn invalid_amount_never_reaches_the_wallet() {
        let mut h = harness(NullWalletProvider::with_account(addr(1)));
        h.client.check_connected().await.unwrap();
        assert!(matches!(
            h.client.donate("lots", "hi").await,
            Err(ClientError::InvalidAmount(_))
        ));
        assert!(h.provider.sent_payments().is_empty());
    }

    #[tokio::test]
    async fn store_failure_after_confirmation_reports_hash() {
        let mut h = harness(NullWalletProvider::with_account(addr(1)));
        h.client.check_connected().await.unwrap();
        h.store.fail_writes(true);

        match h.client.donate("0.5", "hi").await {
            Err(ClientError::RecordNotSaved { hash, .. }) => assert!(hash.starts_with("0x")),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(h.provider.sent_payments().len(), 1);
    }

    #[tokio::test]
    async fn latest_donations_lists_in_order() {
        let mut h = harness(NullWalletProvider::with_account(addr(1)));
        h.client.check_connected().await.unwrap();
        let first = h.client.donate("0.1", "first").await.unwrap();
        let second = h.client.donate("0.2", "second").await.unwrap();

        let listed = h.client.latest_donations().await.unwrap();
        let hashes: Vec<&str> = listed.iter().filter_map(|r| r.get_str("txHash")).collect();
        assert_eq!(hashes, vec![first.tx_hash.as_str(), second.tx_hash.as_str()]);
    }

    #[tokio::test]
    async fn on_chain_donations_are_formatted() {
        let provider = NullWalletProvider::new();
        provider.set_on_chain_records(Ok(vec![OnChainRecord {
            receiver: addr(0xd0).to_string(),
            sender: addr(1).to_string(),
            amount_wei: 1_000_000_000_000_000_000,
            message: "gm".into(),
            keyword: DONATION_KEYWORD.into(),
            timestamp_secs: 1_700_000_000,
        }]));
        let h = harness(provider);

        let shown = h.client.on_chain_donations().await.unwrap();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].amount, "1.0");
        assert_eq!(h.client.transaction_count().await.unwrap(), 1);
    }
}
