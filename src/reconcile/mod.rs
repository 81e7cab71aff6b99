//! Balance reconciliation across every registered account.
//!
//! # Data Flow
//! ```text
//! AccountRegistry
//!     → pass.rs: one task per entry, plus one validator set fetch
//!         → lockup id = sha256(account)[..20 bytes hex] + "." + lockup base
//!         → lockup exists?   no → zero row
//!         → lockup state, selected pool, deposited balance
//!         → pool staked / unstaked / withdrawable (if a pool is selected)
//!     → join_all, then annotate pool activity
//!     → ReconcileReport { accounts (registry order), totals }
//! ```
//!
//! # Design Decisions
//! - Read-only; nothing is persisted
//! - One failed account never fails the pass; it reports zeros and an error
//! - Totals only sum accounts whose reads succeeded

pub mod pass;
pub mod types;

pub use pass::reconcile;
pub use types::{ReconcileReport, ReconcileTotals, ReconciledAccount};
