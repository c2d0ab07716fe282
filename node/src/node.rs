//! The record node: owns the JSON file store and serves it over HTTP.

use std::sync::Arc;
use std::time::Instant;

use charity_rpc::{serve, RpcState};
use charity_store_json::{check_integrity, IntegrityReport, JsonFileStore};
use tokio::net::TcpListener;

use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::shutdown::ShutdownController;

pub struct RecordNode {
    pub config: NodeConfig,
    store: Arc<JsonFileStore>,
    pub shutdown: Arc<ShutdownController>,
}

impl RecordNode {
    /// Open the data file (creating an empty array if missing) and check it.
    ///
    /// An unhealthy file is reported but does not stop the node: reads then
    /// follow the configured read-failure policy and appends are refused.
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        let store = JsonFileStore::open(&config.data_file)?;

        let report = check_integrity(store.path());
        log_integrity(&report);

        Ok(Self {
            config,
            store: Arc::new(store),
            shutdown: Arc::new(ShutdownController::new()),
        })
    }

    pub fn store(&self) -> &Arc<JsonFileStore> {
        &self.store
    }

    /// Handler state built from the configured policies.
    pub fn rpc_state(&self) -> Arc<RpcState> {
        let mut state = RpcState::new(self.store.clone());
        state.validation = self.config.validation;
        state.read_failure = self.config.read_failure;
        Arc::new(state)
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> Result<TcpListener, NodeError> {
        let addr = self.config.socket_addr()?;
        TcpListener::bind(addr)
            .await
            .map_err(|source| NodeError::Bind { addr, source })
    }

    /// Serve on `listener` until shutdown is triggered.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), NodeError> {
        let started = Instant::now();
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(
                %addr,
                data_file = %self.store.path().display(),
                validation = self.config.validation.as_str(),
                read_failure = self.config.read_failure.as_str(),
                "record store listening"
            );
        }

        let shutdown = Arc::clone(&self.shutdown);
        serve(listener, self.rpc_state(), async move {
            shutdown.triggered().await;
        })
        .await?;

        tracing::info!(
            uptime_secs = started.elapsed().as_secs(),
            "record store stopped"
        );
        Ok(())
    }

    /// Bind, serve, and stop on SIGINT/SIGTERM or [`stop`](Self::stop).
    pub async fn start(&self) -> Result<(), NodeError> {
        let listener = self.bind().await?;

        let signals = Arc::clone(&self.shutdown);
        let signal_task = tokio::spawn(async move { signals.wait_for_signal().await });

        let result = self.serve(listener).await;
        signal_task.abort();
        result
    }

    /// Trigger a graceful shutdown.
    pub fn stop(&self) {
        tracing::info!("record node stopping");
        self.shutdown.shutdown();
    }
}

fn log_integrity(report: &IntegrityReport) {
    if report.is_healthy() {
        tracing::info!(
            path = %report.path.display(),
            records = report.records,
            "data file checked"
        );
        if !report.empty_records.is_empty() {
            tracing::warn!(
                positions = ?report.empty_records,
                "data file holds empty records"
            );
        }
    } else {
        tracing::error!(
            path = %report.path.display(),
            errors = ?report.errors,
            non_object_records = ?report.non_object_records,
            "data file failed integrity check; appends will be refused until it is repaired"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charity_store::RecordStore;

    fn config_in(dir: &tempfile::TempDir) -> NodeConfig {
        NodeConfig {
            listen_addr: "127.0.0.1".into(),
            port: 0,
            data_file: dir.path().join("data").join("transactions.json"),
            ..NodeConfig::default()
        }
    }

    #[test]
    fn new_creates_missing_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let node = RecordNode::new(config.clone()).unwrap();
        assert!(config.data_file.exists());
        assert!(node.store().list_all().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_does_not_prevent_startup() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        std::fs::create_dir_all(config.data_file.parent().unwrap()).unwrap();
        std::fs::write(&config.data_file, "{not json").unwrap();

        let node = RecordNode::new(config.clone()).unwrap();
        assert!(node.store().list_all().is_err());
        assert_eq!(std::fs::read_to_string(&config.data_file).unwrap(), "{not json");
    }

    #[test]
    fn rpc_state_carries_configured_policies() {
        let dir = tempfile::tempdir().unwrap();
        let config = NodeConfig {
            validation: charity_store::RecordValidation::DonationFields,
            read_failure: charity_rpc::ReadFailurePolicy::FailClosed,
            ..config_in(&dir)
        };
        let node = RecordNode::new(config).unwrap();
        let state = node.rpc_state();
        assert_eq!(state.validation, charity_store::RecordValidation::DonationFields);
        assert_eq!(state.read_failure, charity_rpc::ReadFailurePolicy::FailClosed);
    }

    #[tokio::test]
    async fn stop_ends_serve() {
        let dir = tempfile::tempdir().unwrap();
        let node = Arc::new(RecordNode::new(config_in(&dir)).unwrap());
        let listener = node.bind().await.unwrap();

        let server = {
            let node = Arc::clone(&node);
            tokio::spawn(async move { node.serve(listener).await })
        };
        node.stop();
        tokio::time::timeout(std::time::Duration::from_secs(5), server)
            .await
            .expect("server stopped")
            .unwrap()
            .unwrap();
    }
}
