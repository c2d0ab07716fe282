//! Donation client for the charity ledger.
//!
//! Provides everything a donation front end needs:
//! - Wallet connection and payment submission through a [`WalletProvider`]
//!   (JSON-RPC adapter included)
//! - Ether amount parsing and formatting
//! - Persisting confirmed donations to the record store and reading them back
//! - Rendering the latest-donations log
//!
//! [`WalletProvider`]: charity_types::WalletProvider

pub mod amount;
pub mod display;
pub mod donation;
pub mod error;
pub mod record_log;
pub mod rpc_provider;

pub use display::{render_latest_donations, DisplayDonation};
pub use donation::{DonationClient, DONATION_KEYWORD};
pub use error::ClientError;
pub use record_log::{LocalRecordLog, RecordLog, RecordStoreClient};
pub use rpc_provider::JsonRpcWalletProvider;
