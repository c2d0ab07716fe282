//! Node configuration with TOML file support.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use charity_rpc::ReadFailurePolicy;
use charity_store::RecordValidation;
use charity_utils::LogFormat;
use serde::{Deserialize, Serialize};

use crate::NodeError;

/// Default port of the record store server.
pub const DEFAULT_PORT: u16 = 5004;

/// Configuration for a record node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Interface the HTTP server binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// The JSON file holding the record array.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// What `GET /transactions` answers when the data file cannot be read.
    #[serde(default)]
    pub read_failure: ReadFailurePolicy,

    /// How strictly `POST /transactions` bodies are checked.
    #[serde(default)]
    pub validation: RecordValidation,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_listen_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_data_file() -> PathBuf {
    PathBuf::from("transactions.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// The address the server binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, NodeError> {
        let ip: IpAddr = self.listen_addr.trim().parse().map_err(|_| {
            NodeError::Config(format!("invalid listen_addr {:?}", self.listen_addr))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
            data_file: default_data_file(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            read_failure: ReadFailurePolicy::default(),
            validation: RecordValidation::default(),
        }
    }
}
