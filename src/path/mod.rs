//! Hardened derivation paths and range enumeration.
//!
//! # Data Flow
//! ```text
//! "44'/397'/0'/0'/1'" (user input)
//!     → types.rs (parse into HdPath, reject malformed text)
//!     → range.rs (PathRange: start/end of equal length)
//!     → lazy iterator of concrete HdPath values, ascending
//!     → one device round trip per yielded path (discovery)
//! ```
//!
//! # Design Decisions
//! - Text form only exists at the boundary; internally paths are integer sequences
//! - Every component is hardened; there is no way to express a soft index
//! - Enumeration is a pure generator with no shared buffers between branches
//! - Digits past the diverging boundary roam over [0, 255]

pub mod range;
pub mod types;

pub use range::{enumerate, PathRange, PathRangeIter, MAX_ROAMING_COMPONENT};
pub use types::{HdPath, PathError, PathResult};
