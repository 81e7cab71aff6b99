//! Device transport trait and error definitions.

use async_trait::async_trait;
use thiserror::Error;

use crate::path::HdPath;

/// Failures talking to the hardware device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// No device reachable (unplugged, locked, bridge down).
    #[error("device disconnected: {0}")]
    Disconnected(String),

    /// The user declined the request on the device.
    #[error("request rejected on device")]
    Rejected,

    /// The device signed with a key other than the one bound to the path.
    #[error("device key for {path} does not match {expected}")]
    KeyMismatch { path: String, expected: String },

    /// The device answered with an unexpected status word.
    #[error("device returned status 0x{0:04x}")]
    Status(u16),

    /// The command data does not fit a single APDU.
    #[error("command data too long ({0} bytes, at most 255)")]
    CommandTooLong(usize),

    /// The device answer could not be decoded.
    #[error("invalid device response: {0}")]
    InvalidResponse(String),

    /// Any other transport failure.
    #[error("device transport error: {0}")]
    Transport(String),
}

/// Result type for device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

/// The two device operations the engine relies on.
///
/// Both may block on physical confirmation.
#[async_trait]
pub trait HardwareTransport: Send + Sync {
    /// Raw public key bytes for `path`.
    async fn get_public_key(&self, path: &HdPath) -> DeviceResult<Vec<u8>>;

    /// Signature over `message` with the key at `path`.
    async fn sign(&self, message: &[u8], path: &HdPath) -> DeviceResult<Vec<u8>>;
}
