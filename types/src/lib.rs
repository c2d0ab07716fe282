//! Fundamental types for the donation ledger.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! schemaless transaction records, the validated donation view of a record,
//! wallet addresses, the clock abstraction used to timestamp donations and
//! the boundary to the external wallet provider.

pub mod address;
pub mod donation;
pub mod error;
pub mod provider;
pub mod record;
pub mod time;

pub use address::WalletAddress;
pub use donation::{DonationRecord, DONATION_FIELDS};
pub use error::RecordError;
pub use provider::{
    Confirmation, OnChainRecord, PaymentRequest, ProviderError, TxHandle, WalletProvider,
};
pub use record::TransactionRecord;
pub use time::{Clock, SystemClock};
