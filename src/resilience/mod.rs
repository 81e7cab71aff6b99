//! Resilience helpers for outbound calls.
//!
//! # Data Flow
//! ```text
//! Read-only RPC call:
//!     → per-request timeout (chain client)
//!     → on transient failure: backoff.rs delay, then next attempt
//! ```
//!
//! # Design Decisions
//! - Retries only for read-only calls; a broadcast is never repeated
//! - Jitter spreads retries from concurrent reconciliation reads

pub mod backoff;
