//! Crate-level error type.

use thiserror::Error;

use crate::chain::{ChainError, KeyError};
use crate::config::loader::ConfigError;
use crate::device::DeviceError;
use crate::index::IndexError;
use crate::path::PathError;
use crate::storage::StoreError;

/// Errors surfaced to the caller of an engine operation.
#[derive(Debug, Error)]
pub enum StakerError {
    /// Malformed path or range text.
    #[error("invalid path: {0}")]
    Path(#[from] PathError),

    /// Malformed key text or device key bytes.
    #[error("invalid key: {0}")]
    Key(#[from] KeyError),

    /// Disconnected device, rejection on device, wrong key.
    #[error("device: {0}")]
    Device(#[from] DeviceError),

    #[error("chain: {0}")]
    Chain(#[from] ChainError),

    #[error("index: {0}")]
    Index(#[from] IndexError),

    #[error("store: {0}")]
    Store(#[from] StoreError),

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    /// Range expands to more paths than the configured limit.
    #[error("range expands to {count} paths, limit is {limit}")]
    RangeTooLarge { count: u128, limit: u64 },

    /// Account id is not in the registry.
    #[error("account {0} is not registered; scan its path first")]
    UnknownAccount(String),

    /// Pool account does not exist on chain.
    #[error("staking pool {0} does not exist")]
    PoolNotFound(String),

    /// Lockup has no staking pool selected.
    #[error("lockup {0} has no staking pool selected")]
    NoPoolSelected(String),
}

impl StakerError {
    /// True for failures caused by the device or its operator.
    pub fn is_device_failure(&self) -> bool {
        matches!(
            self,
            StakerError::Device(_) | StakerError::Chain(ChainError::Device(_))
        )
    }
}

/// Result type for engine operations.
pub type StakerResult<T> = Result<T, StakerError>;
