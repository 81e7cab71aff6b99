//! Chain-specific types and error definitions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::keys::{KeyError, PublicKey, Signature};
use crate::device::DeviceError;

/// One TGas in gas units.
pub const TGAS: u64 = 1_000_000_000_000;

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The account does not exist. Expected when checking for accounts.
    #[error("account {0} does not exist")]
    NotFound(String),

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The node answered with something we could not interpret.
    #[error("invalid RPC response: {0}")]
    InvalidResponse(String),

    /// The transaction could not be serialized.
    #[error("transaction encoding failed: {0}")]
    Encoding(String),

    /// The signer account cannot cover the transaction.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    /// The transaction was executed and failed.
    #[error("transaction failed: {0}")]
    TransactionFailed(String),

    /// Signing was refused or failed on the device.
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// A key or signature could not be decoded.
    #[error("key error: {0}")]
    Key(#[from] KeyError),
}

impl ChainError {
    /// True for the expected "no such account" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ChainError::NotFound(_))
    }
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Subset of `view_account` we use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountState {
    /// Liquid balance in yoctoNEAR.
    pub amount: u128,
    /// Balance locked for validation in yoctoNEAR.
    pub locked: u128,
    /// Storage used in bytes.
    pub storage_usage: u64,
}

/// A signed contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub receiver_id: String,
    pub method_name: String,
    pub args: serde_json::Value,
    pub gas: u64,
    pub deposit: u128,
}

/// Final result of a broadcast transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutcome {
    /// Transaction hash (base58).
    pub hash: String,
    /// Decoded `SuccessValue` payload, if any.
    pub value: Option<String>,
}

/// Signing capability expected by the chain client.
///
/// Passed explicitly to every signed call; the client never stores it.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// Key the transaction is signed with. No device round trip.
    fn public_key(&self) -> PublicKey;

    /// Sign a serialized transaction.
    async fn sign_message(&self, message: &[u8]) -> Result<(Signature, PublicKey), DeviceError>;
}

/// Parse a yoctoNEAR amount carried as a JSON string or number.
pub fn parse_amount(value: &serde_json::Value) -> ChainResult<u128> {
    match value {
        serde_json::Value::String(s) => s
            .parse()
            .map_err(|_| ChainError::InvalidResponse(format!("invalid amount '{}'", s))),
        serde_json::Value::Number(n) => n
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| ChainError::InvalidResponse(format!("invalid amount {}", n))),
        other => Err(ChainError::InvalidResponse(format!("invalid amount {}", other))),
    }
}

/// The pool a lockup has selected. Null and empty strings mean none.
pub fn selected_pool(value: &serde_json::Value) -> Option<&str> {
    value.as_str().filter(|pool| !pool.is_empty())
}
