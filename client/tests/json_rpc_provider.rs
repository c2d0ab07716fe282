//! JSON-RPC wallet provider against a scripted in-process endpoint.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use charity_client::JsonRpcWalletProvider;
use charity_types::{PaymentRequest, ProviderError, TxHandle, WalletAddress, WalletProvider};
use serde_json::{json, Value};
use tokio::net::TcpListener;

const ACCOUNT: &str = "0x00000000000000000000000000000000000000aa";
const DONATION_ADDRESS: &str = "0x00000000000000000000000000000000000000d0";
const HASH: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";

#[derive(Default)]
struct Chain {
    /// Receipt polls that return null before the receipt appears.
    pending_polls: AtomicUsize,
    reject_requests: bool,
    reverted: bool,
    calls: Mutex<Vec<Value>>,
}

async fn handle(State(chain): State<Arc<Chain>>, Json(req): Json<Value>) -> Json<Value> {
    chain.calls.lock().unwrap().push(req.clone());
    let id = req["id"].clone();
    let method = req["method"].as_str().unwrap_or_default();

    let outcome = match method {
        "eth_accounts" => Ok(json!([ACCOUNT])),
        "eth_requestAccounts" if chain.reject_requests => {
            Err(json!({"code": 4001, "message": "User rejected the request."}))
        }
        "eth_requestAccounts" => Ok(json!([ACCOUNT])),
        "eth_sendTransaction" => Ok(json!(HASH)),
        "eth_getTransactionReceipt" => {
            let pending = chain.pending_polls.load(Ordering::SeqCst);
            if pending > 0 {
                chain.pending_polls.store(pending - 1, Ordering::SeqCst);
                Ok(Value::Null)
            } else {
                let status = if chain.reverted { "0x0" } else { "0x1" };
                Ok(json!({"transactionHash": HASH, "blockNumber": "0x10", "status": status}))
            }
        }
        _ => Err(json!({"code": -32601, "message": "method not found"})),
    };

    Json(match outcome {
        Ok(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
        Err(error) => json!({"jsonrpc": "2.0", "id": id, "error": error}),
    })
}

async fn start(chain: Chain) -> (JsonRpcWalletProvider, Arc<Chain>) {
    let chain = Arc::new(chain);
    let app = Router::new()
        .route("/", post(handle))
        .with_state(Arc::clone(&chain));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let provider = JsonRpcWalletProvider::new(url)
        .unwrap()
        .with_polling(Duration::from_millis(10), 5);
    (provider, chain)
}

fn payment() -> PaymentRequest {
    PaymentRequest {
        from: WalletAddress::parse(ACCOUNT).unwrap(),
        to: WalletAddress::parse(DONATION_ADDRESS).unwrap(),
        value_wei: 500_000_000_000_000_000,
        message: "hi".into(),
        keyword: "donation".into(),
    }
}

#[tokio::test]
async fn lists_authorised_accounts() {
    let (provider, _) = start(Chain::default()).await;
    let accounts = provider.accounts().await.unwrap();
    assert_eq!(accounts, vec![WalletAddress::parse(ACCOUNT).unwrap()]);
}

#[tokio::test]
async fn user_rejection_is_recognised() {
    let (provider, _) = start(Chain {
        reject_requests: true,
        ..Chain::default()
    })
    .await;
    assert_eq!(
        provider.request_accounts().await,
        Err(ProviderError::UserRejected)
    );
}

#[tokio::test]
async fn payment_is_sent_as_value_transfer() {
    let (provider, chain) = start(Chain::default()).await;
    let handle = provider.send_payment(&payment()).await.unwrap();
    assert_eq!(handle.hash, HASH);

    let calls = chain.calls.lock().unwrap();
    let tx = &calls[0]["params"][0];
    assert_eq!(calls[0]["method"], "eth_sendTransaction");
    assert_eq!(tx["from"], ACCOUNT);
    assert_eq!(tx["to"], DONATION_ADDRESS);
    assert_eq!(tx["gas"], "0x5208");
    assert_eq!(tx["value"], "0x6f05b59d3b20000");
}

#[tokio::test]
async fn confirmation_waits_for_receipt() {
    let (provider, chain) = start(Chain {
        pending_polls: AtomicUsize::new(2),
        ..Chain::default()
    })
    .await;
    let confirmation = provider
        .wait_for_confirmation(&TxHandle { hash: HASH.into() })
        .await
        .unwrap();
    assert_eq!(confirmation.hash, HASH);
    assert_eq!(confirmation.block_number, Some(16));
    assert_eq!(chain.calls.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn reverted_receipt_is_an_error() {
    let (provider, _) = start(Chain {
        reverted: true,
        ..Chain::default()
    })
    .await;
    assert_eq!(
        provider
            .wait_for_confirmation(&TxHandle { hash: HASH.into() })
            .await,
        Err(ProviderError::Reverted(HASH.into()))
    );
}

#[tokio::test]
async fn confirmation_gives_up_after_max_polls() {
    let (provider, _) = start(Chain {
        pending_polls: AtomicUsize::new(100),
        ..Chain::default()
    })
    .await;
    assert!(matches!(
        provider
            .wait_for_confirmation(&TxHandle { hash: HASH.into() })
            .await,
        Err(ProviderError::ConfirmationTimeout { attempts: 5, .. })
    ));
}

#[tokio::test]
async fn contract_reads_are_unsupported() {
    let (provider, _) = start(Chain::default()).await;
    assert!(matches!(
        provider.on_chain_record_count().await,
        Err(ProviderError::Unsupported(_))
    ));
}

#[tokio::test]
async fn missing_endpoint_means_no_provider() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    drop(listener);
    let provider = JsonRpcWalletProvider::new(url).unwrap();
    assert_eq!(provider.accounts().await, Err(ProviderError::ProviderAbsent));
}
