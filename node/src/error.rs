use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] charity_store::StoreError),

    #[error("JSON store error: {0}")]
    JsonStore(#[from] charity_store_json::JsonStoreError),

    #[error("RPC server error: {0}")]
    Rpc(#[from] charity_rpc::RpcError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },
}
