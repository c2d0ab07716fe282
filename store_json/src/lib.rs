//! JSON file storage backend for the donation ledger.
//!
//! Implements [`charity_store::RecordStore`] over a single pretty-printed JSON
//! array on disk. Appends are serialized through an internal lock and every
//! write replaces the file atomically (temp file in the same directory, fsync,
//! rename), so readers always see a complete document.

pub mod error;
pub mod file;
pub mod integrity;

pub use error::JsonStoreError;
pub use file::JsonFileStore;
pub use integrity::{check_integrity, IntegrityReport};
