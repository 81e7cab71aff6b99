//! Chain client contract used by the engine.

use async_trait::async_trait;
use std::collections::HashSet;

use crate::chain::types::{
    AccountState, ChainError, ChainResult, FunctionCall, TransactionOutcome, TransactionSigner,
};

/// Read and write access to the chain.
///
/// Read calls are unsigned. `function_call` takes its signer as an argument
/// so a signer can never outlive the one transaction it was built for.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Account state; `ChainError::NotFound` when the account does not exist.
    async fn view_account(&self, account_id: &str) -> ChainResult<AccountState>;

    /// Read-only contract call returning the decoded JSON result.
    async fn view_function(
        &self,
        contract_id: &str,
        method_name: &str,
        args: serde_json::Value,
    ) -> ChainResult<serde_json::Value>;

    /// Account ids of the validators active in the current epoch.
    async fn active_validators(&self) -> ChainResult<HashSet<String>>;

    /// Sign with `signer` on behalf of `signer_id` and submit one call.
    async fn function_call(
        &self,
        signer: &dyn TransactionSigner,
        signer_id: &str,
        call: FunctionCall,
    ) -> ChainResult<TransactionOutcome>;
}

/// Probe whether an account exists, treating absence as a normal answer.
pub async fn account_exists(chain: &dyn ChainClient, account_id: &str) -> ChainResult<bool> {
    match chain.view_account(account_id).await {
        Ok(_) => Ok(true),
        Err(ChainError::NotFound(_)) => Ok(false),
        Err(e) => Err(e),
    }
}
