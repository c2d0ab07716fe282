//! Behavioural tests for the JSON file store: ordering, validation,
//! idempotent initialization and concurrent appends.

use std::sync::Arc;
use std::thread;

use charity_store::{RecordStore, RecordValidation, StoreError};
use charity_store_json::JsonFileStore;
use charity_types::TransactionRecord;
use proptest::prelude::*;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn temp_store() -> (tempfile::TempDir, JsonFileStore) {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = JsonFileStore::open(dir.path().join("transactions.json")).expect("open store");
    (dir, store)
}

fn donation(hash: &str, amount: &str) -> TransactionRecord {
    TransactionRecord::from_value(json!({
        "txHash": hash,
        "sender": "0x1",
        "amount": amount,
        "message": "hi",
        "timestamp": "t1",
    }))
    .expect("non-empty record")
}

fn hashes(records: &[TransactionRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.get_str("txHash").unwrap_or_default().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Append / list
// ---------------------------------------------------------------------------

#[test]
fn fresh_store_lists_nothing() {
    let (_dir, store) = temp_store();
    assert!(store.list_all().unwrap().is_empty());
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn append_then_list_returns_record_verbatim() {
    let (_dir, store) = temp_store();
    let first = donation("0xabc", "0.5");
    store.append(&first).unwrap();
    assert_eq!(store.list_all().unwrap(), vec![first.clone()]);

    let second = donation("0xdef", "1.25");
    store.append(&second).unwrap();
    assert_eq!(store.list_all().unwrap(), vec![first, second]);
}

#[test]
fn sequential_appends_keep_insertion_order() {
    let (_dir, store) = temp_store();
    let expected: Vec<String> = (0..25).map(|i| format!("0x{i:02x}")).collect();
    for hash in &expected {
        store.append(&donation(hash, "0.01")).unwrap();
    }
    assert_eq!(hashes(&store.list_all().unwrap()), expected);
}

#[test]
fn records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transactions.json");
    {
        let store = JsonFileStore::open(&path).unwrap();
        store.append(&donation("0xabc", "0.5")).unwrap();
    }
    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(hashes(&reopened.list_all().unwrap()), vec!["0xabc"]);
}

// ---------------------------------------------------------------------------
// Invalid input
// ---------------------------------------------------------------------------

#[test]
fn empty_and_null_records_are_rejected_without_writing() {
    let (_dir, store) = temp_store();
    store.append(&donation("0xabc", "0.5")).unwrap();
    let before = std::fs::read_to_string(store.path()).unwrap();

    for value in [json!({}), Value::Null, json!([]), json!("text")] {
        let err = store
            .append_value(value, RecordValidation::NonEmpty)
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));
    }

    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn strict_validation_rejects_partial_donations() {
    let (_dir, store) = temp_store();
    let err = store
        .append_value(json!({"txHash": "0xabc"}), RecordValidation::DonationFields)
        .unwrap_err();
    assert!(err.is_invalid_input());
    assert_eq!(store.count().unwrap(), 0);

    store
        .append_value(
            donation("0xabc", "0.5").into_value(),
            RecordValidation::DonationFields,
        )
        .unwrap();
    assert_eq!(store.count().unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Initialization
// ---------------------------------------------------------------------------

#[test]
fn initialize_is_idempotent_and_never_truncates() {
    let (_dir, store) = temp_store();
    store.append(&donation("0xabc", "0.5")).unwrap();

    store.initialize().unwrap();
    store.initialize().unwrap();
    let reopened = JsonFileStore::open(store.path()).unwrap();
    reopened.initialize().unwrap();

    assert_eq!(hashes(&store.list_all().unwrap()), vec!["0xabc"]);
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn concurrent_appends_lose_nothing() {
    let (_dir, store) = temp_store();
    let store = Arc::new(store);

    let writers: Vec<_> = (0..8)
        .map(|w| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..10 {
                    store.append(&donation(&format!("0x{w}-{i}"), "0.1")).unwrap();
                }
            })
        })
        .collect();
    for handle in writers {
        handle.join().unwrap();
    }

    let records = store.list_all().unwrap();
    assert_eq!(records.len(), 80);

    // Each writer's own records stay in the order that writer issued them.
    for w in 0..8 {
        let prefix = format!("0x{w}-");
        let own: Vec<String> = hashes(&records)
            .into_iter()
            .filter(|h| h.starts_with(&prefix))
            .collect();
        let expected: Vec<String> = (0..10).map(|i| format!("{prefix}{i}")).collect();
        assert_eq!(own, expected);
    }
}

#[test]
fn readers_never_see_a_partial_document() {
    let (_dir, store) = temp_store();
    let store = Arc::new(store);

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 0..50 {
                store.append(&donation(&format!("0x{i}"), "0.1")).unwrap();
            }
        })
    };
    let reader = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            let mut last = 0;
            for _ in 0..200 {
                let n = store.list_all().expect("consistent snapshot").len();
                assert!(n >= last, "sequence shrank from {last} to {n}");
                last = n;
            }
        })
    };
    writer.join().unwrap();
    reader.join().unwrap();
    assert_eq!(store.count().unwrap(), 50);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// N sequential appends read back as exactly N records in append order,
    /// and the last record read is the last one appended.
    #[test]
    fn appends_read_back_in_order(amounts in prop::collection::vec("[0-9]{1,3}\\.[0-9]{1,4}", 1..12)) {
        let (_dir, store) = temp_store();
        let records: Vec<TransactionRecord> = amounts
            .iter()
            .enumerate()
            .map(|(i, a)| donation(&format!("0x{i}"), a))
            .collect();
        for r in &records {
            store.append(r).unwrap();
        }
        let listed = store.list_all().unwrap();
        prop_assert_eq!(listed.last(), records.last());
        prop_assert_eq!(listed, records);
    }
}
