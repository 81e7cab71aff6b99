//! Account discovery over a range of derivation paths.
//!
//! # Data Flow
//! ```text
//! PathRange
//!     → scan.rs: for each path, sequentially
//!         → device.get_public_key(path)
//!         → resolver.rs: index lookup + implicit account check
//!             (index down → prompt.rs asks the operator)
//!         → collect (path, key, account) tuples
//!     → registry merge + save, once per completed pass
//! ```
//!
//! # Design Decisions
//! - One device round trip per path; never parallel
//! - Per-path failures are logged and skipped, never fatal to the pass
//! - Only one pass may run against a store at a time (caller's duty)

pub mod prompt;
pub mod resolver;
pub mod scan;

pub use prompt::{AccountPrompt, NoPrompt, StdinPrompt};
pub use resolver::AccountDiscovery;
pub use scan::{scan_range, ScanFailure, ScanReport};
