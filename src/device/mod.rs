//! Hardware signing device access.
//!
//! # Data Flow
//! ```text
//! discovery (public key per path) / signer (one signature per transaction)
//!     → HardwareTransport (types.rs)
//!     → apdu.rs (Ledger NEAR app command framing)
//!     → bridge.rs (APDU exchange over an HTTP bridge)
//!     → physical device, confirmation on screen
//! ```
//!
//! # Security Constraints
//! - Private keys never leave the device; only paths go in
//! - The device handles one request at a time; callers await each call
//! - A rejection on the device is an ordinary, retryable failure

pub mod apdu;
pub mod bridge;
pub mod types;

pub use bridge::ApduBridge;
pub use types::{DeviceError, DeviceResult, HardwareTransport};
