//! User-initiated lockup operations.
//!
//! # Data Flow
//! ```text
//! account id
//!     → registry.find (stored path + public key)
//!     → precondition read (pool exists / pool selected)
//!     → DelegatedSigner::bind(device, path, key)   fresh per call
//!     → ChainClient::function_call(&signer, account, call)
//!     → device confirmation → broadcast → TransactionOutcome
//! ```
//!
//! # Design Decisions
//! - Exactly one signed transaction per operation
//! - Signers are dropped when the operation returns
//! - The registry is only read here

pub mod lockup;

pub use lockup::{last_stake_elapsed, select_pool, stake, unstake, withdraw_all};
