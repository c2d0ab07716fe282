//! Acceptance rules applied to records before they are appended.

use charity_types::{DonationRecord, TransactionRecord};
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// How strictly incoming records are checked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordValidation {
    /// Any object with at least one field.
    #[default]
    NonEmpty,
    /// Additionally require `txHash`, `sender`, `amount`, `message` and
    /// `timestamp` as strings.
    DonationFields,
}

impl RecordValidation {
    /// Pass `record` through unchanged if it satisfies this rule.
    pub fn check(self, record: TransactionRecord) -> Result<TransactionRecord, StoreError> {
        if self == RecordValidation::DonationFields {
            DonationRecord::validate(&record)?;
        }
        Ok(record)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordValidation::NonEmpty => "non_empty",
            RecordValidation::DonationFields => "donation_fields",
        }
    }
}
