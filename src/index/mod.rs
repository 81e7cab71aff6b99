//! Public key → account id lookup service.
//!
//! # Design Decisions
//! - Best effort: the service may be down or lag behind new accounts
//! - Every failure is an `IndexError`, which discovery turns into a fallback

pub mod helper;

pub use helper::HelperIndex;

use async_trait::async_trait;
use thiserror::Error;

/// Failures of the index service. Always treated as transient.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index request failed: {0}")]
    Request(String),

    #[error("index returned status {0}")]
    Status(u16),

    #[error("index response malformed: {0}")]
    Malformed(String),
}

/// Lookup of accounts known to use a public key.
#[async_trait]
pub trait AccountIndex: Send + Sync {
    /// Account ids holding `public_key` (text form `ed25519:...`).
    async fn lookup(&self, public_key: &str) -> Result<Vec<String>, IndexError>;
}
