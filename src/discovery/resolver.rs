//! Resolve the accounts controlled by one public key.

use crate::chain::{account_exists, ChainClient, ChainError, ChainResult, PublicKey};
use crate::discovery::prompt::AccountPrompt;
use crate::index::AccountIndex;
use crate::observability::metrics;

/// Combines the index service, the implicit account check and the operator
/// prompt.
pub struct AccountDiscovery<'a> {
    chain: &'a dyn ChainClient,
    index: &'a dyn AccountIndex,
    prompt: &'a dyn AccountPrompt,
}

impl<'a> AccountDiscovery<'a> {
    pub fn new(
        chain: &'a dyn ChainClient,
        index: &'a dyn AccountIndex,
        prompt: &'a dyn AccountPrompt,
    ) -> Self {
        Self { chain, index, prompt }
    }

    /// Account ids controlled by `public_key`, index results first.
    ///
    /// An unreachable index or node never fails discovery. Errors are only
    /// returned for unexpected chain failures while checking the implicit
    /// account.
    pub async fn discover(&self, public_key: &PublicKey) -> ChainResult<Vec<String>> {
        let key_str = public_key.to_string();
        let implicit = public_key.implicit_account_id();

        let mut accounts = match self.index.lookup(&key_str).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(public_key = %key_str, error = %e, "Index lookup failed, falling back");
                metrics::record_discovery_fallback();
                self.prompt
                    .ask_account_id(&key_str)
                    .await
                    .into_iter()
                    .collect()
            }
        };

        if self.implicit_exists(&implicit).await? {
            accounts.push(implicit);
        }

        let mut unique = Vec::with_capacity(accounts.len());
        for account in accounts {
            if !unique.contains(&account) {
                unique.push(account);
            }
        }
        Ok(unique)
    }

    /// An unreachable node leaves the implicit account unconfirmed.
    async fn implicit_exists(&self, implicit: &str) -> ChainResult<bool> {
        match account_exists(self.chain, implicit).await {
            Err(e @ (ChainError::Rpc(_) | ChainError::Timeout(_))) => {
                tracing::warn!(
                    account_id = %implicit,
                    error = %e,
                    "Implicit account lookup failed, skipping"
                );
                metrics::record_discovery_fallback();
                Ok(false)
            }
            other => other,
        }
    }
}
