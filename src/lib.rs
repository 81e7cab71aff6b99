//! Hardware-wallet account discovery and delegated lockup staking for NEAR.

// Core data
pub mod path;
pub mod registry;
pub mod storage;

// External collaborators
pub mod chain;
pub mod device;
pub mod index;

// Engine
pub mod discovery;
pub mod operations;
pub mod reconcile;
pub mod signer;

// Cross-cutting concerns
pub mod config;
pub mod error;
pub mod observability;
pub mod resilience;
pub mod session;

pub use config::schema::StakerConfig;
pub use error::{StakerError, StakerResult};
pub use session::Session;
