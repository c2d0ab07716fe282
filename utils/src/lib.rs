//! Shared utilities for the charity donation ledger.

pub mod logging;

pub use logging::{init_logging, LogFormat, UnknownLogFormat};
