//! Store trait and error definitions.

use thiserror::Error;

/// Key holding the serialized account registry.
pub const REGISTRY_KEY: &str = "staker-accounts";

/// Key holding the unix time of the last successful stake.
pub const LAST_STAKE_TIME_KEY: &str = "last-stake-time";

/// Errors raised by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file or a stored value is not valid JSON.
    #[error("store encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Minimal string key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key was never written.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}
