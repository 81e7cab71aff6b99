//! Chain integration subsystem.
//!
//! # Data Flow
//! ```text
//! reconcile / discovery (read-only)
//!     → client.rs (ChainClient trait, account_exists)
//!     → near.rs (JSON-RPC with failover, timeouts, retries)
//!
//! operations (signed)
//!     → near.rs function_call(signer, ...)
//!     → codec.rs (borsh transaction bytes)
//!     → signer signs on device → broadcast_tx_commit
//! ```
//!
//! # Design Decisions
//! - "Account does not exist" is a value (`NotFound`), never a crash
//! - The signer is a call argument; no connection ever holds one
//! - Amounts stay raw yoctoNEAR (u128); units.rs converts only at the CLI edge

pub mod client;
pub mod codec;
pub mod keys;
pub mod near;
pub mod types;
pub mod units;

pub use client::{account_exists, ChainClient};
pub use keys::{lockup_account_id, KeyError, PublicKey, Signature};
pub use near::NearRpcClient;
pub use types::{
    parse_amount, selected_pool, AccountState, ChainError, ChainResult, FunctionCall,
    TransactionOutcome, TransactionSigner, TGAS,
};
pub use units::{format_near_amount, parse_near_amount, ONE_NEAR};
