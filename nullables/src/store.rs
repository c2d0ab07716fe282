//! Nullable record store — thread-safe in-memory storage for testing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use charity_store::{RecordStore, StoreError};
use charity_types::TransactionRecord;

/// An in-memory record store for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
///
/// Reads and writes can be made to fail on demand to exercise error paths.
pub struct NullRecordStore {
    records: Mutex<Vec<TransactionRecord>>,
    initialized: AtomicBool,
    init_calls: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl NullRecordStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            initialized: AtomicBool::new(false),
            init_calls: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Pre-populate the store.
    pub fn with_records(records: Vec<TransactionRecord>) -> Self {
        let store = Self::new();
        *store.records.lock().unwrap() = records;
        store.initialized.store(true, Ordering::SeqCst);
        store
    }

    /// Make every subsequent read fail with [`StoreError::Read`].
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent append fail with [`StoreError::Write`].
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of the stored records, bypassing fault injection.
    pub fn snapshot(&self) -> Vec<TransactionRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// How many times `initialize` has been called.
    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }
}

impl Default for NullRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for NullRecordStore {
    fn initialize(&self) -> Result<(), StoreError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn append(&self, record: &TransactionRecord) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Write("injected write failure".into()));
        }
        self.initialized.store(true, Ordering::SeqCst);
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<TransactionRecord>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Read("injected read failure".into()));
        }
        Ok(self.snapshot())
    }
}
