//! Explicit process context.
//!
//! Built once at startup and passed by reference to every operation. Holds
//! the configuration and the shared collaborators; never the device.

use std::sync::Arc;

use crate::chain::{ChainClient, NearRpcClient};
use crate::config::StakerConfig;
use crate::error::StakerResult;
use crate::index::{AccountIndex, HelperIndex};
use crate::registry::AccountRegistry;
use crate::storage::{FileStore, KeyValueStore};

pub struct Session {
    config: StakerConfig,
    chain: Arc<dyn ChainClient>,
    index: Arc<dyn AccountIndex>,
    store: Arc<dyn KeyValueStore>,
}

impl Session {
    /// Assemble a session from already constructed collaborators.
    pub fn new(
        config: StakerConfig,
        chain: Arc<dyn ChainClient>,
        index: Arc<dyn AccountIndex>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            config,
            chain,
            index,
            store,
        }
    }

    /// Build the production collaborators described by `config`.
    pub fn connect(config: StakerConfig) -> StakerResult<Self> {
        let chain = NearRpcClient::new(&config.network, config.retries.clone())?;
        let index = HelperIndex::new(&config.network)?;
        let store = FileStore::open(&config.storage.path)?;

        tracing::info!(
            network_id = %config.network.network_id,
            store = %config.storage.path,
            "Session ready"
        );

        Ok(Self::new(
            config,
            Arc::new(chain),
            Arc::new(index),
            Arc::new(store),
        ))
    }

    pub fn config(&self) -> &StakerConfig {
        &self.config
    }

    pub fn chain(&self) -> &dyn ChainClient {
        self.chain.as_ref()
    }

    pub fn index(&self) -> &dyn AccountIndex {
        self.index.as_ref()
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Current registry contents from the store.
    pub fn load_registry(&self) -> StakerResult<AccountRegistry> {
        Ok(AccountRegistry::load(self.store())?)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("network_id", &self.config.network.network_id)
            .field("store", &self.config.storage.path)
            .finish()
    }
}
