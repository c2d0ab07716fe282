//! Validated donation view of a transaction record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RecordError;
use crate::record::TransactionRecord;

/// Field names every donation record carries, in display order.
pub const DONATION_FIELDS: [&str; 5] = ["txHash", "sender", "amount", "message", "timestamp"];

/// A transaction record with the five donation fields present as strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRecord {
    pub tx_hash: String,
    pub sender: String,
    /// Amount in ether, as the donor entered it (e.g. `"0.5"`).
    pub amount: String,
    pub message: String,
    pub timestamp: String,
}

impl DonationRecord {
    /// Check that `record` carries every donation field as a string.
    ///
    /// Extra fields are allowed and ignored.
    pub fn validate(record: &TransactionRecord) -> Result<(), RecordError> {
        for field in DONATION_FIELDS {
            match record.get(field) {
                None => return Err(RecordError::MissingField(field)),
                Some(Value::String(_)) => {}
                Some(_) => return Err(RecordError::InvalidField { field }),
            }
        }
        Ok(())
    }

    fn field(record: &TransactionRecord, field: &'static str) -> Result<String, RecordError> {
        match record.get(field) {
            None => Err(RecordError::MissingField(field)),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(RecordError::InvalidField { field }),
        }
    }
}

impl TryFrom<&TransactionRecord> for DonationRecord {
    type Error = RecordError;

    fn try_from(record: &TransactionRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            tx_hash: Self::field(record, "txHash")?,
            sender: Self::field(record, "sender")?,
            amount: Self::field(record, "amount")?,
            message: Self::field(record, "message")?,
            timestamp: Self::field(record, "timestamp")?,
        })
    }
}

impl From<DonationRecord> for TransactionRecord {
    fn from(d: DonationRecord) -> Self {
        let mut fields = Map::new();
        fields.insert("txHash".into(), Value::String(d.tx_hash));
        fields.insert("sender".into(), Value::String(d.sender));
        fields.insert("amount".into(), Value::String(d.amount));
        fields.insert("message".into(), Value::String(d.message));
        fields.insert("timestamp".into(), Value::String(d.timestamp));
        TransactionRecord::from_fields_unchecked(fields)
    }
}
