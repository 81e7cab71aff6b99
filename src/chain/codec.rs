//! Borsh encoding of transactions.
//!
//! Only the shapes needed for a single function call are encoded:
//!
//! ```text
//! Transaction       = signer_id, public_key, nonce, receiver_id, block_hash, actions
//! Action::FunctionCall (tag 2) = method_name, args, gas, deposit
//! SignedTransaction = transaction, signature
//! ```
//!
//! Keys and signatures carry a leading key-type byte (see `keys.rs`).

use borsh::BorshSerialize;
use sha2::{Digest, Sha256};
use std::io::Write;

use crate::chain::keys::{PublicKey, Signature};
use crate::chain::types::{ChainError, ChainResult};

/// Position of `FunctionCall` in the chain's action enum.
const ACTION_FUNCTION_CALL: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct FunctionCallAction {
    pub method_name: String,
    pub args: Vec<u8>,
    pub gas: u64,
    pub deposit: u128,
}

/// Transaction actions. Only contract calls are ever sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    FunctionCall(FunctionCallAction),
}

impl BorshSerialize for Action {
    fn serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            Action::FunctionCall(call) => {
                ACTION_FUNCTION_CALL.serialize(writer)?;
                call.serialize(writer)
            }
        }
    }
}

/// An unsigned transaction.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct Transaction {
    pub signer_id: String,
    pub public_key: PublicKey,
    pub nonce: u64,
    pub receiver_id: String,
    pub block_hash: [u8; 32],
    pub actions: Vec<Action>,
}

impl Transaction {
    /// Borsh bytes; this is the message handed to the signer.
    pub fn encode(&self) -> ChainResult<Vec<u8>> {
        borsh::to_vec(self).map_err(|e| ChainError::Encoding(e.to_string()))
    }

    /// Base58 SHA-256 of the encoded transaction.
    pub fn hash(&self) -> ChainResult<String> {
        Ok(bs58::encode(Sha256::digest(self.encode()?)).into_string())
    }
}

#[derive(Debug, Clone, BorshSerialize)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signature: Signature,
}

impl SignedTransaction {
    /// Bytes for `broadcast_tx_commit`.
    pub fn encode(&self) -> ChainResult<Vec<u8>> {
        borsh::to_vec(self).map_err(|e| ChainError::Encoding(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction {
            signer_id: "a.near".to_string(),
            public_key: PublicKey::from_bytes(&[9u8; 32]).unwrap(),
            nonce: 5,
            receiver_id: "b".to_string(),
            block_hash: [3u8; 32],
            actions: vec![Action::FunctionCall(FunctionCallAction {
                method_name: "m".to_string(),
                args: b"{}".to_vec(),
                gas: 7,
                deposit: 1,
            })],
        }
    }

    #[test]
    fn test_transaction_layout() {
        let bytes = sample().encode().unwrap();
        let mut expected = Vec::new();
        expected.extend_from_slice(&[6, 0, 0, 0]);
        expected.extend_from_slice(b"a.near");
        expected.push(0);
        expected.extend_from_slice(&[9u8; 32]);
        expected.extend_from_slice(&[5, 0, 0, 0, 0, 0, 0, 0]);
        expected.extend_from_slice(&[1, 0, 0, 0]);
        expected.extend_from_slice(b"b");
        expected.extend_from_slice(&[3u8; 32]);
        expected.extend_from_slice(&[1, 0, 0, 0]);
        expected.push(2);
        expected.extend_from_slice(&[1, 0, 0, 0]);
        expected.extend_from_slice(b"m");
        expected.extend_from_slice(&[2, 0, 0, 0]);
        expected.extend_from_slice(b"{}");
        expected.extend_from_slice(&[7, 0, 0, 0, 0, 0, 0, 0]);
        let mut deposit = [0u8; 16];
        deposit[0] = 1;
        expected.extend_from_slice(&deposit);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_signed_appends_signature() {
        let transaction = sample();
        let unsigned = transaction.encode().unwrap();
        let signed = SignedTransaction {
            transaction,
            signature: Signature::from_bytes(&[4u8; 64]).unwrap(),
        }
        .encode()
        .unwrap();
        assert_eq!(&signed[..unsigned.len()], unsigned.as_slice());
        assert_eq!(signed[unsigned.len()], 0);
        assert_eq!(&signed[unsigned.len() + 1..], &[4u8; 64][..]);
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(sample().hash().unwrap(), sample().hash().unwrap());
        let mut other = sample();
        other.nonce += 1;
        assert_ne!(sample().hash().unwrap(), other.hash().unwrap());
    }
}
