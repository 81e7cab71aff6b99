//! Key encodings and deterministic account identifiers.

use borsh::BorshSerialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use thiserror::Error;

const ED25519_PREFIX: &str = "ed25519:";

/// Borsh key-type tag for ed25519 keys and signatures.
const KEY_TYPE_ED25519: u8 = 0;

/// Length of the hex prefix used for lockup account names.
const LOCKUP_HASH_LEN: usize = 40;

/// Errors decoding keys and signatures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Only ed25519 keys are supported.
    #[error("unsupported key type in '{0}'")]
    UnsupportedCurve(String),

    /// Base58 payload could not be decoded.
    #[error("invalid base58: {0}")]
    InvalidEncoding(String),

    /// Decoded payload has the wrong size.
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// An ed25519 public key as used on chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let key: [u8; 32] = bytes.try_into().map_err(|_| KeyError::InvalidLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Implicit account id: lowercase hex of the key bytes.
    pub fn implicit_account_id(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", ED25519_PREFIX, bs58::encode(self.0).into_string())
    }
}

impl FromStr for PublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let encoded = s
            .strip_prefix(ED25519_PREFIX)
            .ok_or_else(|| KeyError::UnsupportedCurve(s.to_string()))?;
        let bytes = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| KeyError::InvalidEncoding(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl BorshSerialize for PublicKey {
    fn serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        KEY_TYPE_ED25519.serialize(writer)?;
        writer.write_all(&self.0)
    }
}

/// An ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; 64]);

impl Signature {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let sig: [u8; 64] = bytes.try_into().map_err(|_| KeyError::InvalidLength {
            expected: 64,
            actual: bytes.len(),
        })?;
        Ok(Self(sig))
    }

    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", bs58::encode(self.0).into_string())
    }
}

impl BorshSerialize for Signature {
    fn serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        KEY_TYPE_ED25519.serialize(writer)?;
        writer.write_all(&self.0)
    }
}

/// Lockup account owned by `account_id` under `lockup_base`.
///
/// `hex(sha256(account_id))[..40] + "." + lockup_base`
pub fn lockup_account_id(account_id: &str, lockup_base: &str) -> String {
    let digest = Sha256::digest(account_id.as_bytes());
    let hash = hex::encode(digest);
    format!("{}.{}", &hash[..LOCKUP_HASH_LEN], lockup_base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_key_round_trip() {
        let key = PublicKey::from_bytes(&[1u8; 32]).unwrap();
        let text = key.to_string();
        assert!(text.starts_with("ed25519:"));
        assert_eq!(text.parse::<PublicKey>().unwrap(), key);
    }

    #[test]
    fn test_public_key_rejects_bad_input() {
        assert!(matches!(
            "secp256k1:abc".parse::<PublicKey>(),
            Err(KeyError::UnsupportedCurve(_))
        ));
        assert!(matches!(
            "ed25519:0OIl".parse::<PublicKey>(),
            Err(KeyError::InvalidEncoding(_))
        ));
        assert!(matches!(
            "ed25519:2g".parse::<PublicKey>(),
            Err(KeyError::InvalidLength { expected: 32, .. })
        ));
    }

    #[test]
    fn test_implicit_account_id() {
        let key = PublicKey::from_bytes(&[0xab; 32]).unwrap();
        assert_eq!(key.implicit_account_id(), "ab".repeat(32));
    }

    #[test]
    fn test_lockup_account_id() {
        let id = lockup_account_id("alice.near", "lockup.near");
        let (hash, base) = id.split_once('.').unwrap();
        assert_eq!(hash.len(), 40);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(base, "lockup.near");
        assert_eq!(id, lockup_account_id("alice.near", "lockup.near"));
        assert_ne!(id, lockup_account_id("bob.near", "lockup.near"));

        let expected = hex::encode(Sha256::digest(b"alice.near"));
        assert_eq!(hash, &expected[..40]);
    }

    #[test]
    fn test_signature_length() {
        assert!(Signature::from_bytes(&[0u8; 64]).is_ok());
        assert_eq!(
            Signature::from_bytes(&[0u8; 63]),
            Err(KeyError::InvalidLength { expected: 64, actual: 63 })
        );
    }
}
