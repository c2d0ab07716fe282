//! Display helpers for the donation log.

use std::fmt::Write;

use charity_types::time::format_unix_secs;
use charity_types::{OnChainRecord, TransactionRecord};
use serde::{Deserialize, Serialize};

use crate::amount::format_ether;

/// An on-chain donation shaped for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayDonation {
    pub address_to: String,
    pub address_from: String,
    pub timestamp: String,
    pub message: String,
    pub keyword: String,
    /// Amount in ether.
    pub amount: String,
}

impl From<&OnChainRecord> for DisplayDonation {
    fn from(r: &OnChainRecord) -> Self {
        Self {
            address_to: r.receiver.clone(),
            address_from: r.sender.clone(),
            timestamp: format_unix_secs(r.timestamp_secs),
            message: r.message.clone(),
            keyword: r.keyword.clone(),
            amount: format_ether(r.amount_wei),
        }
    }
}

/// Render stored records as the "Latest Donations" text block.
pub fn render_latest_donations(records: &[TransactionRecord]) -> String {
    let mut out = String::from("Latest Donations\n");
    if records.is_empty() {
        out.push_str("No recent transactions\n");
        return out;
    }
    for record in records {
        let field = |name: &str| record.get_str(name).unwrap_or("-");
        // Writing into a String cannot fail.
        let _ = writeln!(out);
        let _ = writeln!(out, "Txn Hash: {}", field("txHash"));
        let _ = writeln!(out, "Sender: {}", field("sender"));
        let _ = writeln!(out, "Amount: {} ETH", field("amount"));
        let _ = writeln!(out, "Message: {}", field("message"));
        let _ = writeln!(out, "Date: {}", field("timestamp"));
    }
    out
}
