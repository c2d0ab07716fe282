//! The record node: configuration, startup checks and the serving loop of
//! the transaction record store.

pub mod config;
pub mod error;
pub mod node;
pub mod shutdown;

pub use config::{NodeConfig, DEFAULT_PORT};
pub use error::NodeError;
pub use node::RecordNode;
pub use shutdown::ShutdownController;
