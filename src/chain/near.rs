//! NEAR JSON-RPC client with failover, timeouts and retries.
//!
//! # Responsibilities
//! - Query account state, contract views and the validator set
//! - Build, sign (through an injected signer) and broadcast function calls
//! - Fail over between endpoints on transport errors and timeouts
//! - Retry read-only calls with jittered backoff
//! - Classify node errors ("does not exist while viewing" is not a failure)

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::chain::client::ChainClient;
use crate::chain::codec::{Action, FunctionCallAction, SignedTransaction, Transaction};
use crate::chain::types::{
    parse_amount, AccountState, ChainError, ChainResult, FunctionCall, TransactionOutcome,
    TransactionSigner,
};
use crate::config::{NetworkConfig, RetryConfig};
use crate::observability::metrics;
use crate::resilience::backoff::retry_delay;

/// Marker the node uses for missing accounts and access keys.
const NOT_FOUND_MARKER: &str = "does not exist while viewing";

/// Failure kinds that mean "the signer cannot pay".
const BALANCE_FAILURES: [&str; 2] = ["NotEnoughBalance", "LackBalanceForState"];

/// Outcome of one endpoint attempt that did not produce a JSON-RPC answer.
enum EndpointFailure {
    Transport(String),
    Timeout,
}

/// JSON-RPC client for a NEAR node.
pub struct NearRpcClient {
    http: reqwest::Client,
    /// Primary endpoint first, then failovers.
    endpoints: Vec<url::Url>,
    timeout_duration: Duration,
    timeout_secs: u64,
    retries: RetryConfig,
    request_id: AtomicU64,
}

impl NearRpcClient {
    /// Create a client from configuration.
    ///
    /// An invalid primary URL is an error; invalid failover URLs are skipped.
    pub fn new(config: &NetworkConfig, retries: RetryConfig) -> ChainResult<Self> {
        let primary: url::Url = config.node_url.parse().map_err(|e| {
            ChainError::Rpc(format!("Invalid RPC URL '{}': {}", config.node_url, e))
        })?;

        let mut endpoints = vec![primary];
        for url_str in &config.failover_urls {
            match url_str.parse() {
                Ok(url) => endpoints.push(url),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL"),
            }
        }

        tracing::info!(
            node_url = %config.node_url,
            network_id = %config.network_id,
            failovers = endpoints.len() - 1,
            "Chain client initialized"
        );

        Ok(Self {
            http: reqwest::Client::new(),
            endpoints,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
            timeout_secs: config.rpc_timeout_secs,
            retries,
            request_id: AtomicU64::new(1),
        })
    }

    /// Issue a JSON-RPC call. `subject` names the account the call is about
    /// and is used for not-found classification.
    async fn call(
        &self,
        method: &'static str,
        params: Value,
        subject: &str,
        retryable: bool,
    ) -> ChainResult<Value> {
        let mut failures = 0;
        loop {
            match self.call_once(method, &params, subject).await {
                Ok(result) => return Ok(result),
                Err(e @ (ChainError::Rpc(_) | ChainError::Timeout(_))) => {
                    metrics::record_rpc_error(method);
                    failures += 1;
                    let delay = if retryable {
                        retry_delay(&self.retries, failures)
                    } else {
                        None
                    };
                    let Some(delay) = delay else {
                        return Err(e);
                    };
                    tracing::debug!(
                        method,
                        failures,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying RPC call"
                    );
                    sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn call_once(&self, method: &'static str, params: &Value, subject: &str) -> ChainResult<Value> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id.to_string(),
            "method": method,
            "params": params,
        });

        let mut all_timed_out = true;
        for (i, endpoint) in self.endpoints.iter().enumerate() {
            match self.post(endpoint, &body).await {
                Ok(envelope) => return unwrap_envelope(envelope, subject),
                Err(EndpointFailure::Transport(e)) => {
                    all_timed_out = false;
                    tracing::warn!(endpoint_idx = i, method, error = %e, "RPC error, trying next endpoint");
                }
                Err(EndpointFailure::Timeout) => {
                    tracing::warn!(endpoint_idx = i, method, "RPC timeout, trying next endpoint");
                }
            }
        }

        if all_timed_out {
            Err(ChainError::Timeout(self.timeout_secs))
        } else {
            Err(ChainError::Rpc("All RPC endpoints failed".to_string()))
        }
    }

    async fn post(&self, endpoint: &url::Url, body: &Value) -> Result<Value, EndpointFailure> {
        let request = async {
            let response = self
                .http
                .post(endpoint.clone())
                .json(body)
                .send()
                .await
                .map_err(|e| e.to_string())?;
            let status = response.status();
            // nodes may answer JSON-RPC errors with non-2xx codes
            response
                .json::<Value>()
                .await
                .map_err(|e| format!("status {}: {}", status, e))
        };

        match timeout(self.timeout_duration, request).await {
            Ok(Ok(envelope)) => Ok(envelope),
            Ok(Err(e)) => Err(EndpointFailure::Transport(e)),
            Err(_) => Err(EndpointFailure::Timeout),
        }
    }

    async fn access_key_nonce(&self, account_id: &str, public_key: &str) -> ChainResult<u64> {
        let result = self
            .call(
                "query",
                json!({
                    "request_type": "view_access_key",
                    "finality": "final",
                    "account_id": account_id,
                    "public_key": public_key,
                }),
                account_id,
                true,
            )
            .await?;
        result["nonce"]
            .as_u64()
            .ok_or_else(|| ChainError::InvalidResponse("access key without nonce".to_string()))
    }

    async fn final_block_hash(&self) -> ChainResult<[u8; 32]> {
        let result = self.call("block", json!({ "finality": "final" }), "", true).await?;
        let hash = result["header"]["hash"]
            .as_str()
            .ok_or_else(|| ChainError::InvalidResponse("block without hash".to_string()))?;
        let bytes = bs58::decode(hash)
            .into_vec()
            .map_err(|e| ChainError::InvalidResponse(format!("block hash: {}", e)))?;
        bytes
            .try_into()
            .map_err(|_| ChainError::InvalidResponse("block hash is not 32 bytes".to_string()))
    }
}

#[async_trait]
impl ChainClient for NearRpcClient {
    async fn view_account(&self, account_id: &str) -> ChainResult<AccountState> {
        let result = self
            .call(
                "query",
                json!({
                    "request_type": "view_account",
                    "finality": "final",
                    "account_id": account_id,
                }),
                account_id,
                true,
            )
            .await?;

        Ok(AccountState {
            amount: parse_amount(&result["amount"])?,
            locked: parse_amount(&result["locked"]).unwrap_or_default(),
            storage_usage: result["storage_usage"].as_u64().unwrap_or_default(),
        })
    }

    async fn view_function(
        &self,
        contract_id: &str,
        method_name: &str,
        args: Value,
    ) -> ChainResult<Value> {
        let args = serde_json::to_vec(&args)
            .map_err(|e| ChainError::InvalidResponse(e.to_string()))?;
        let result = self
            .call(
                "query",
                json!({
                    "request_type": "call_function",
                    "finality": "final",
                    "account_id": contract_id,
                    "method_name": method_name,
                    "args_base64": BASE64.encode(args),
                }),
                contract_id,
                true,
            )
            .await?;

        let bytes: Vec<u8> = result["result"]
            .as_array()
            .ok_or_else(|| ChainError::InvalidResponse("view result is not a byte array".to_string()))?
            .iter()
            .map(|b| b.as_u64().and_then(|b| u8::try_from(b).ok()))
            .collect::<Option<_>>()
            .ok_or_else(|| ChainError::InvalidResponse("view result is not a byte array".to_string()))?;

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            ChainError::InvalidResponse(format!("{}.{} returned non-JSON: {}", contract_id, method_name, e))
        })
    }

    async fn active_validators(&self) -> ChainResult<HashSet<String>> {
        let result = self.call("validators", json!([null]), "", true).await?;
        let validators = result["current_validators"]
            .as_array()
            .ok_or_else(|| ChainError::InvalidResponse("missing current_validators".to_string()))?;

        Ok(validators
            .iter()
            .filter_map(|v| v["account_id"].as_str().map(str::to_string))
            .collect())
    }

    async fn function_call(
        &self,
        signer: &dyn TransactionSigner,
        signer_id: &str,
        call: FunctionCall,
    ) -> ChainResult<TransactionOutcome> {
        let public_key = signer.public_key();
        let nonce = self.access_key_nonce(signer_id, &public_key.to_string()).await?;
        let block_hash = self.final_block_hash().await?;

        let args = serde_json::to_vec(&call.args)
            .map_err(|e| ChainError::InvalidResponse(e.to_string()))?;
        let transaction = Transaction {
            signer_id: signer_id.to_string(),
            public_key,
            nonce: nonce + 1,
            receiver_id: call.receiver_id.clone(),
            block_hash,
            actions: vec![Action::FunctionCall(FunctionCallAction {
                method_name: call.method_name.clone(),
                args,
                gas: call.gas,
                deposit: call.deposit,
            })],
        };

        let message = transaction.encode()?;
        let local_hash = transaction.hash()?;
        let (signature, _) = signer.sign_message(&message).await?;
        let signed = SignedTransaction {
            transaction,
            signature,
        }
        .encode()?;

        tracing::info!(
            signer_id,
            receiver_id = %call.receiver_id,
            method = %call.method_name,
            gas = call.gas,
            "Broadcasting transaction"
        );

        let result = match self
            .call("broadcast_tx_commit", json!([BASE64.encode(signed)]), signer_id, false)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                metrics::record_transaction(&call.method_name, "error");
                return Err(classify_balance_failure(e));
            }
        };

        let hash = result["transaction"]["hash"]
            .as_str()
            .map(str::to_string)
            .unwrap_or(local_hash);
        let outcome = parse_outcome(&result["status"], hash);
        metrics::record_transaction(
            &call.method_name,
            if outcome.is_ok() { "success" } else { "failure" },
        );
        outcome
    }
}

/// Extract `result` from a JSON-RPC envelope or classify its error.
fn unwrap_envelope(mut envelope: Value, subject: &str) -> ChainResult<Value> {
    if let Some(error) = envelope.get("error").filter(|e| !e.is_null()) {
        return Err(classify_error(error, subject));
    }

    let result = envelope
        .get_mut("result")
        .map(Value::take)
        .ok_or_else(|| ChainError::InvalidResponse("missing result".to_string()))?;

    // query errors from older nodes arrive inside `result`
    if let Some(message) = result.get("error").and_then(Value::as_str) {
        if message.contains(NOT_FOUND_MARKER) {
            return Err(ChainError::NotFound(subject.to_string()));
        }
        return Err(ChainError::Rpc(message.to_string()));
    }
    Ok(result)
}

fn classify_error(error: &Value, subject: &str) -> ChainError {
    let cause = error["cause"]["name"].as_str().unwrap_or_default();
    let text = error.to_string();

    if matches!(cause, "UNKNOWN_ACCOUNT" | "UNKNOWN_ACCESS_KEY") || text.contains(NOT_FOUND_MARKER) {
        return ChainError::NotFound(subject.to_string());
    }
    if cause == "TIMEOUT_ERROR" {
        return ChainError::Rpc(format!("node timeout: {}", text));
    }
    let message = error["data"]
        .as_str()
        .or_else(|| error["message"].as_str())
        .map(str::to_string)
        .unwrap_or(text);
    ChainError::Rpc(message)
}

fn classify_balance_failure(error: ChainError) -> ChainError {
    match error {
        ChainError::Rpc(message) if BALANCE_FAILURES.iter().any(|m| message.contains(m)) => {
            ChainError::InsufficientFunds(message)
        }
        other => other,
    }
}

fn parse_outcome(status: &Value, hash: String) -> ChainResult<TransactionOutcome> {
    if let Some(failure) = status.get("Failure") {
        let text = failure.to_string();
        if BALANCE_FAILURES.iter().any(|m| text.contains(m)) {
            return Err(ChainError::InsufficientFunds(text));
        }
        return Err(ChainError::TransactionFailed(text));
    }

    let value = match status.get("SuccessValue").and_then(Value::as_str) {
        Some(encoded) if !encoded.is_empty() => {
            let bytes = BASE64
                .decode(encoded)
                .map_err(|e| ChainError::InvalidResponse(format!("SuccessValue: {}", e)))?;
            Some(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => None,
    };
    Ok(TransactionOutcome { hash, value })
}

impl std::fmt::Debug for NearRpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NearRpcClient")
            .field("endpoints", &self.endpoints.len())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_from_structured_error() {
        let envelope = json!({
            "jsonrpc": "2.0",
            "id": "1",
            "error": {
                "name": "HANDLER_ERROR",
                "cause": { "name": "UNKNOWN_ACCOUNT", "info": {} },
                "code": -32000,
                "message": "Server error",
            }
        });
        let err = unwrap_envelope(envelope, "x.near").unwrap_err();
        assert!(matches!(err, ChainError::NotFound(id) if id == "x.near"));
    }

    #[test]
    fn test_not_found_from_legacy_query_error() {
        let envelope = json!({
            "result": { "error": "account abc does not exist while viewing", "logs": [] }
        });
        assert!(unwrap_envelope(envelope, "abc").unwrap_err().is_not_found());
    }

    #[test]
    fn test_other_errors_are_rpc() {
        let envelope = json!({ "error": { "code": -32000, "message": "Server error", "data": "boom" } });
        assert!(matches!(unwrap_envelope(envelope, "a").unwrap_err(), ChainError::Rpc(m) if m == "boom"));
    }

    #[test]
    fn test_parse_outcome() {
        let ok = parse_outcome(&json!({ "SuccessValue": BASE64.encode("true") }), "h".into()).unwrap();
        assert_eq!(ok.value.as_deref(), Some("true"));

        let empty = parse_outcome(&json!({ "SuccessValue": "" }), "h".into()).unwrap();
        assert!(empty.value.is_none());

        let failed = parse_outcome(&json!({ "Failure": { "ActionError": {} } }), "h".into());
        assert!(matches!(failed, Err(ChainError::TransactionFailed(_))));

        let broke = parse_outcome(
            &json!({ "Failure": { "InvalidTxError": { "NotEnoughBalance": {} } } }),
            "h".into(),
        );
        assert!(matches!(broke, Err(ChainError::InsufficientFunds(_))));
    }

    #[test]
    fn test_invalid_primary_url() {
        let config = NetworkConfig {
            node_url: "not a url".to_string(),
            ..NetworkConfig::default()
        };
        assert!(NearRpcClient::new(&config, RetryConfig::default()).is_err());
    }
}
