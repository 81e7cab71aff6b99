//! Signer bound to one derivation path.

use async_trait::async_trait;
use ed25519_dalek::{Signature as DalekSignature, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};

use crate::chain::{KeyError, PublicKey, Signature, TransactionSigner};
use crate::device::{DeviceError, HardwareTransport};
use crate::path::HdPath;

/// Signing capability for a single (path, key) pair.
///
/// Borrows the transport so it cannot outlive the operation that created it.
pub struct DelegatedSigner<'a> {
    transport: &'a dyn HardwareTransport,
    path: HdPath,
    public_key: PublicKey,
}

impl<'a> DelegatedSigner<'a> {
    /// Bind `path` and its known key to `transport`. No device round trip.
    pub fn bind(
        transport: &'a dyn HardwareTransport,
        path: HdPath,
        public_key: &str,
    ) -> Result<Self, KeyError> {
        let public_key: PublicKey = public_key.parse()?;
        tracing::debug!(path = %path, public_key = %public_key, "Signer bound");
        Ok(Self {
            transport,
            path,
            public_key,
        })
    }

    pub fn path(&self) -> &HdPath {
        &self.path
    }

    /// Check that `signature` was made by the bound key. The device signs the
    /// SHA-256 digest of the message.
    fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), DeviceError> {
        let mismatch = || DeviceError::KeyMismatch {
            path: self.path.to_string(),
            expected: self.public_key.to_string(),
        };
        let key = VerifyingKey::from_bytes(self.public_key.as_bytes()).map_err(|_| mismatch())?;
        let digest = Sha256::digest(message);
        key.verify(&digest, &DalekSignature::from_bytes(signature.as_bytes()))
            .map_err(|_| mismatch())
    }
}

#[async_trait]
impl TransactionSigner for DelegatedSigner<'_> {
    fn public_key(&self) -> PublicKey {
        self.public_key
    }

    async fn sign_message(&self, message: &[u8]) -> Result<(Signature, PublicKey), DeviceError> {
        let raw = self.transport.sign(message, &self.path).await.map_err(|e| {
            tracing::warn!(path = %self.path, error = %e, "Device signing failed");
            e
        })?;
        let signature =
            Signature::from_bytes(&raw).map_err(|e| DeviceError::InvalidResponse(e.to_string()))?;

        self.verify(message, &signature)?;
        Ok((signature, self.public_key))
    }
}

impl std::fmt::Debug for DelegatedSigner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegatedSigner")
            .field("path", &self.path.to_string())
            .field("public_key", &self.public_key.to_string())
            .finish()
    }
}
