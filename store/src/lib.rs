//! Abstract storage trait for the donation ledger.
//!
//! Every storage backend (JSON file, in-memory for testing) implements
//! [`RecordStore`]. The rest of the codebase depends only on the trait.

pub mod error;
pub mod record;
pub mod validation;

pub use error::StoreError;
pub use record::RecordStore;
pub use validation::RecordValidation;
