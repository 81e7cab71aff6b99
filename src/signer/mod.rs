//! Per-transaction signing delegated to the hardware device.
//!
//! # Lifecycle
//! ```text
//! operation starts
//!     → DelegatedSigner::bind(transport, path, "ed25519:...")
//!     → handed to ChainClient::function_call as an argument
//!     → sign_message: one device round trip, signature checked against the key
//!     → signer dropped when the operation returns
//! ```
//!
//! # Design Decisions
//! - Construction is cheap and never touches the device
//! - Nothing is cached; the device re-derives the key for every signature
//! - A signer must not be reused for another account

pub mod delegated;

pub use delegated::DelegatedSigner;
