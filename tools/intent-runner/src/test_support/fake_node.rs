//! Minimal JSON-RPC node served over HTTP: answers the calls ethers makes to sign, send and
//! confirm a transaction, and remembers the nonce of every raw transaction it receives.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{extract::State, response::Json, routing::post, Router};
use ethers::{
    types::{transaction::eip2718::TypedTransaction, Transaction, TransactionReceipt, H160, H256, U64},
    utils::{keccak256, rlp::Rlp},
};
use serde_json::{json, to_value, Value};
use tokio::task::JoinHandle;

type Shared = Arc<Mutex<NodeState>>;

#[derive(Default)]
struct NodeState {
    /// Delay before answering `eth_getTransactionCount`.
    nonce_delay: Duration,
    revert: bool,
    sent: Vec<(H256, U64)>,
}

pub struct FakeNode {
    pub base_url: String,
    state: Shared,
    handle: JoinHandle<()>,
}

impl FakeNode {
    pub async fn spawn(nonce_delay: Duration) -> Self {
        let state: Shared = Arc::new(Mutex::new(NodeState {
            nonce_delay,
            ..Default::default()
        }));
        let app = Router::new().route("/", post(rpc)).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}:{}", addr.ip(), addr.port());

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url,
            state,
            handle,
        }
    }

    /// Nonces of the raw transactions received, in arrival order.
    pub fn nonces(&self) -> Vec<u64> {
        let state = self.state.lock().unwrap();
        state.sent.iter().map(|(_, nonce)| nonce.as_u64()).collect()
    }

    /// Mine every later transaction with a failed status.
    pub fn revert_all(&self) {
        self.state.lock().unwrap().revert = true;
    }

    pub fn abort(self) {
        self.handle.abort();
    }
}

async fn rpc(State(state): State<Shared>, Json(request): Json<Value>) -> Json<Value> {
    let id = request["id"].clone();
    let param = request["params"][0].clone();
    let method = request["method"].as_str().unwrap_or_default().to_string();

    let result = match method.as_str() {
        "eth_chainId" => json!("0x7a69"),
        "eth_gasPrice" => json!("0x1"),
        "eth_estimateGas" => json!("0x5208"),
        "eth_blockNumber" => json!("0x1"),
        "eth_getTransactionCount" => {
            let delay = state.lock().unwrap().nonce_delay;
            tokio::time::sleep(delay).await;
            json!("0x0")
        }
        "eth_sendRawTransaction" => send_raw(&state, &param),
        "eth_getTransactionByHash" => find(&state, &param, |index, hash, nonce, _| {
            to_value(Transaction {
                hash,
                nonce: nonce.as_u64().into(),
                block_hash: Some(H256::repeat_byte(0xbb)),
                block_number: Some(U64::one()),
                transaction_index: Some(U64::from(index as u64)),
                ..Default::default()
            })
            .unwrap()
        }),
        "eth_getTransactionReceipt" => find(&state, &param, |index, hash, _, revert| {
            to_value(TransactionReceipt {
                transaction_hash: hash,
                transaction_index: U64::from(index as u64),
                block_hash: Some(H256::repeat_byte(0xbb)),
                block_number: Some(U64::one()),
                contract_address: Some(H160::from_low_u64_be(0xc0de_0000 + index as u64)),
                status: Some(if revert { U64::zero() } else { U64::one() }),
                ..Default::default()
            })
            .unwrap()
        }),
        other => {
            return Json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": format!("method {other} not found") },
            }))
        }
    };
    Json(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
}

fn send_raw(state: &Shared, param: &Value) -> Value {
    let raw = hex::decode(param.as_str().unwrap_or_default().trim_start_matches("0x")).unwrap();
    let (tx, _signature) = TypedTransaction::decode_signed(&Rlp::new(&raw)).unwrap();
    let nonce = tx.nonce().map(|n| U64::from(n.as_u64())).unwrap_or_default();
    let hash = H256::from(keccak256(&raw));
    state.lock().unwrap().sent.push((hash, nonce));
    json!(hash)
}

fn find(
    state: &Shared,
    param: &Value,
    render: impl FnOnce(usize, H256, U64, bool) -> Value,
) -> Value {
    let Ok(hash) = serde_json::from_value::<H256>(param.clone()) else {
        return Value::Null;
    };
    let state = state.lock().unwrap();
    state
        .sent
        .iter()
        .position(|(sent, _)| *sent == hash)
        .map(|index| render(index, hash, state.sent[index].1, state.revert))
        .unwrap_or(Value::Null)
}
