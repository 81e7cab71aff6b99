//! Durable key-value storage.
//!
//! # Data Flow
//! ```text
//! registry.rs / operations
//!     → KeyValueStore::get / set (string blobs)
//!     → file.rs (JSON object on disk, temp file + rename)
//!     → memory.rs (DashMap, tests and dry runs)
//! ```
//!
//! # Design Decisions
//! - Values are opaque strings; callers own their schema
//! - Every `set` rewrites the whole file atomically
//! - Only two keys are used: the account registry and the last stake time

pub mod file;
pub mod memory;
pub mod types;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use types::{KeyValueStore, StoreError, StoreResult, LAST_STAKE_TIME_KEY, REGISTRY_KEY};
