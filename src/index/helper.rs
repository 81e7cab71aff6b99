//! Index lookup through the wallet helper service.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::NetworkConfig;
use crate::index::{AccountIndex, IndexError};

/// Client for `GET {helper_url}/publicKey/{key}/accountsIndexer`.
#[derive(Debug, Clone)]
pub struct HelperIndex {
    client: reqwest::Client,
    base_url: String,
}

impl HelperIndex {
    pub fn new(config: &NetworkConfig) -> Result<Self, IndexError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.rpc_timeout_secs))
            .build()
            .map_err(|e| IndexError::Request(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.helper_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AccountIndex for HelperIndex {
    async fn lookup(&self, public_key: &str) -> Result<Vec<String>, IndexError> {
        let url = format!("{}/publicKey/{}/accountsIndexer", self.base_url, public_key);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| IndexError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IndexError::Status(status.as_u16()));
        }

        let accounts: Vec<String> = response
            .json()
            .await
            .map_err(|e| IndexError::Malformed(e.to_string()))?;
        tracing::debug!(public_key, found = accounts.len(), "Index lookup complete");
        Ok(accounts)
    }
}
