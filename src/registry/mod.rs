//! Persisted registry of discovered accounts.
//!
//! # Data Flow
//! ```text
//! session start → AccountRegistry::load (store key "staker-accounts")
//! discovery pass → merge (dedup by account id, append only) → save
//! operations     → find(account_id) → stored path + key for the signer
//! ```
//!
//! # Design Decisions
//! - Account id is the only dedup key; the first path seen for it wins
//! - Entries are never removed here
//! - The whole registry is rewritten on every save

pub mod entry;
pub mod store;

pub use entry::{merge, AccountEntry};
pub use store::AccountRegistry;
