//! HTTP server for the transaction record store.
//!
//! Provides two endpoints:
//! - `POST /transactions` — append one record
//! - `GET /transactions` — list every record in insertion order
//!
//! Cross-origin requests are accepted from any origin.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::RpcError;
pub use handlers::{AckResponse, ReadFailurePolicy};
pub use server::{router, serve, RpcServer, RpcState};
