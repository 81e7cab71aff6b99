//! Shared mocks and HTTP backends for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use lockup_staker::chain::{
    AccountState, ChainClient, ChainError, ChainResult, FunctionCall, PublicKey,
    TransactionOutcome, TransactionSigner,
};
use lockup_staker::device::{DeviceError, DeviceResult, HardwareTransport};
use lockup_staker::discovery::AccountPrompt;
use lockup_staker::index::{AccountIndex, IndexError};
use lockup_staker::path::HdPath;
use lockup_staker::storage::MemoryStore;
use lockup_staker::{Session, StakerConfig};

// ---------------------------------------------------------------------------
// HTTP backends
// ---------------------------------------------------------------------------

/// Start a programmable mock backend on an ephemeral port.
///
/// The handler receives the request path and body and returns status and body.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let Some((path, body)) = read_request(&mut socket).await else {
                            return;
                        };
                        let (status, body) = f(path, body).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// JSON-RPC backend dispatching on the `method` field of each request.
pub async fn start_rpc_backend<F>(f: F) -> SocketAddr
where
    F: Fn(&str, &Value) -> Value + Send + Sync + 'static,
{
    let f = Arc::new(f);
    start_programmable_backend(move |_path, body| {
        let f = f.clone();
        async move {
            let request: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
            let method = request["method"].as_str().unwrap_or_default().to_string();
            let mut envelope = f(&method, &request["params"]);
            envelope["jsonrpc"] = json!("2.0");
            envelope["id"] = request["id"].clone();
            (200, envelope.to_string())
        }
    })
    .await
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn read_request(socket: &mut TcpStream) -> Option<(String, String)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..end]).to_string();
    Some((path, body))
}

// ---------------------------------------------------------------------------
// Device
// ---------------------------------------------------------------------------

pub fn path(text: &str) -> HdPath {
    text.parse().unwrap()
}

/// Deterministic device: the key at each path is derived from `seed` and
/// the path text.
pub struct MockDevice {
    seed: &'static str,
    pub unreachable: Mutex<HashSet<HdPath>>,
    pub reject_signing: bool,
    pub key_requests: AtomicUsize,
    pub signs: AtomicUsize,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::with_seed("device-a")
    }

    /// A device holding a different seed.
    pub fn with_seed(seed: &'static str) -> Self {
        Self {
            seed,
            unreachable: Mutex::new(HashSet::new()),
            reject_signing: false,
            key_requests: AtomicUsize::new(0),
            signs: AtomicUsize::new(0),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            reject_signing: true,
            ..Self::new()
        }
    }

    pub fn fail_path(&self, path: HdPath) {
        self.unreachable.lock().unwrap().insert(path);
    }

    pub fn signing_key(&self, path: &HdPath) -> SigningKey {
        let seed: [u8; 32] = Sha256::digest(format!("{}:{}", self.seed, path)).into();
        SigningKey::from_bytes(&seed)
    }

    pub fn public_key(&self, path: &HdPath) -> PublicKey {
        PublicKey::from_bytes(self.signing_key(path).verifying_key().as_bytes()).unwrap()
    }
}

#[async_trait]
impl HardwareTransport for MockDevice {
    async fn get_public_key(&self, path: &HdPath) -> DeviceResult<Vec<u8>> {
        self.key_requests.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.lock().unwrap().contains(path) {
            return Err(DeviceError::Disconnected("unplugged".into()));
        }
        Ok(self.signing_key(path).verifying_key().to_bytes().to_vec())
    }

    async fn sign(&self, message: &[u8], path: &HdPath) -> DeviceResult<Vec<u8>> {
        self.signs.fetch_add(1, Ordering::SeqCst);
        if self.reject_signing {
            return Err(DeviceError::Rejected);
        }
        let digest = Sha256::digest(message);
        Ok(self.signing_key(path).sign(&digest).to_bytes().to_vec())
    }
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// In-memory chain. Views without a configured answer fail with an RPC error.
#[derive(Default)]
pub struct MockChain {
    accounts: Mutex<HashMap<String, AccountState>>,
    failing_accounts: Mutex<HashSet<String>>,
    views: Mutex<HashMap<(String, String), Value>>,
    validators: Mutex<Option<HashSet<String>>>,
    pub broadcasts: Mutex<Vec<(String, FunctionCall)>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_account(&self, account_id: &str, amount: u128) {
        self.accounts.lock().unwrap().insert(
            account_id.to_string(),
            AccountState {
                amount,
                ..AccountState::default()
            },
        );
    }

    /// `view_account` on this id fails with a transport error.
    pub fn fail_account(&self, account_id: &str) {
        self.failing_accounts
            .lock()
            .unwrap()
            .insert(account_id.to_string());
    }

    pub fn set_view(&self, contract: &str, method: &str, value: Value) {
        self.views
            .lock()
            .unwrap()
            .insert((contract.to_string(), method.to_string()), value);
    }

    pub fn set_validators(&self, validators: &[&str]) {
        *self.validators.lock().unwrap() =
            Some(validators.iter().map(|v| v.to_string()).collect());
    }

    pub fn broadcast_count(&self) -> usize {
        self.broadcasts.lock().unwrap().len()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn view_account(&self, account_id: &str) -> ChainResult<AccountState> {
        if self.failing_accounts.lock().unwrap().contains(account_id) {
            return Err(ChainError::Rpc("connection reset".into()));
        }
        self.accounts
            .lock()
            .unwrap()
            .get(account_id)
            .cloned()
            .ok_or_else(|| ChainError::NotFound(account_id.to_string()))
    }

    async fn view_function(
        &self,
        contract_id: &str,
        method_name: &str,
        _args: Value,
    ) -> ChainResult<Value> {
        self.views
            .lock()
            .unwrap()
            .get(&(contract_id.to_string(), method_name.to_string()))
            .cloned()
            .ok_or_else(|| ChainError::Rpc(format!("no view {}.{}", contract_id, method_name)))
    }

    async fn active_validators(&self) -> ChainResult<HashSet<String>> {
        self.validators
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ChainError::Rpc("validators unavailable".into()))
    }

    async fn function_call(
        &self,
        signer: &dyn TransactionSigner,
        signer_id: &str,
        call: FunctionCall,
    ) -> ChainResult<TransactionOutcome> {
        let message = json!({
            "signer_id": signer_id,
            "receiver_id": call.receiver_id,
            "method_name": call.method_name,
            "args": call.args,
        });
        signer.sign_message(message.to_string().as_bytes()).await?;

        let mut broadcasts = self.broadcasts.lock().unwrap();
        broadcasts.push((signer_id.to_string(), call));
        Ok(TransactionOutcome {
            hash: format!("tx{}", broadcasts.len()),
            value: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Index and prompt
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockIndex {
    answers: Mutex<HashMap<String, Vec<String>>>,
    pub down: bool,
    pub lookups: AtomicUsize,
}

impl MockIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn down() -> Self {
        Self {
            down: true,
            ..Self::default()
        }
    }

    pub fn answer(&self, public_key: &PublicKey, accounts: &[&str]) {
        self.answers.lock().unwrap().insert(
            public_key.to_string(),
            accounts.iter().map(|a| a.to_string()).collect(),
        );
    }
}

#[async_trait]
impl AccountIndex for MockIndex {
    async fn lookup(&self, public_key: &str) -> Result<Vec<String>, IndexError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.down {
            return Err(IndexError::Request("connection refused".into()));
        }
        Ok(self
            .answers
            .lock()
            .unwrap()
            .get(public_key)
            .cloned()
            .unwrap_or_default())
    }
}

/// Prompt with a fixed answer that counts how often it was asked.
pub struct ScriptedPrompt {
    answer: Option<String>,
    pub asked: AtomicUsize,
}

impl ScriptedPrompt {
    pub fn answering(answer: Option<&str>) -> Self {
        Self {
            answer: answer.map(str::to_string),
            asked: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AccountPrompt for ScriptedPrompt {
    async fn ask_account_id(&self, _public_key: &str) -> Option<String> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct Harness {
    pub chain: Arc<MockChain>,
    pub index: Arc<MockIndex>,
    pub store: Arc<MemoryStore>,
    pub session: Session,
}

pub fn harness(index: MockIndex) -> Harness {
    harness_with_config(index, StakerConfig::default())
}

pub fn harness_with_config(index: MockIndex, config: StakerConfig) -> Harness {
    let chain = Arc::new(MockChain::new());
    let index = Arc::new(index);
    let store = Arc::new(MemoryStore::new());
    let session = Session::new(config, chain.clone(), index.clone(), store.clone());
    Harness {
        chain,
        index,
        store,
        session,
    }
}
