//! Transaction record storage trait.

use charity_types::TransactionRecord;
use serde_json::Value;

use crate::validation::RecordValidation;
use crate::StoreError;

/// Durable append-only log of transaction records.
///
/// Implementations must serialize appends so that concurrent callers never
/// lose a record, and must never expose a partially written sequence to
/// [`list_all`](RecordStore::list_all).
pub trait RecordStore: Send + Sync {
    /// Create the backing storage as an empty sequence if it does not exist.
    ///
    /// Idempotent: an existing store is left untouched.
    fn initialize(&self) -> Result<(), StoreError>;

    /// Append one record to the end of the sequence.
    ///
    /// Returns only once the write is durable. On error nothing is appended.
    fn append(&self, record: &TransactionRecord) -> Result<(), StoreError>;

    /// Read the full sequence in insertion order.
    ///
    /// An uninitialized store reads as empty.
    fn list_all(&self) -> Result<Vec<TransactionRecord>, StoreError>;

    /// Number of stored records.
    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.list_all()?.len())
    }

    /// Validate an untyped value and append it.
    ///
    /// `null`, non-objects and `{}` fail with [`StoreError::InvalidInput`]
    /// without touching storage.
    fn append_value(&self, value: Value, validation: RecordValidation) -> Result<(), StoreError> {
        let record = validation.check(TransactionRecord::from_value(value)?)?;
        self.append(&record)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for std::sync::Arc<S> {
    fn initialize(&self) -> Result<(), StoreError> {
        (**self).initialize()
    }

    fn append(&self, record: &TransactionRecord) -> Result<(), StoreError> {
        (**self).append(record)
    }

    fn list_all(&self) -> Result<Vec<TransactionRecord>, StoreError> {
        (**self).list_all()
    }

    fn count(&self) -> Result<usize, StoreError> {
        (**self).count()
    }
}
