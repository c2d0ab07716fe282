//! Axum-based HTTP server.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use charity_store::{RecordStore, RecordValidation};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::RpcError;
use crate::handlers::{list_transactions, save_transaction, ReadFailurePolicy};

/// Shared state handed to every handler.
pub struct RpcState {
    pub store: Arc<dyn RecordStore>,
    pub validation: RecordValidation,
    pub read_failure: ReadFailurePolicy,
}

impl RpcState {
    /// State with the default policies: non-empty validation, fail-open reads.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            validation: RecordValidation::default(),
            read_failure: ReadFailurePolicy::default(),
        }
    }
}

/// Build the application router with CORS and request tracing.
pub fn router(state: Arc<RpcState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(save_transaction),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve the router on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<RpcState>,
    shutdown: F,
) -> Result<(), RpcError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| RpcError::Server(e.to_string()))
}

/// The record store HTTP server, configured with an address and shared state.
pub struct RpcServer {
    pub addr: SocketAddr,
    pub state: Arc<RpcState>,
}

impl RpcServer {
    pub fn new(addr: SocketAddr, state: Arc<RpcState>) -> Self {
        Self { addr, state }
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn start<F>(&self, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|e| RpcError::Server(format!("failed to bind {}: {e}", self.addr)))?;
        info!("record store listening on {}", self.addr);
        serve(listener, Arc::clone(&self.state), shutdown).await
    }
}
