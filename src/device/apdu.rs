//! Command framing for the Ledger NEAR application.
//!
//! # Commands
//! - get public key: `CLA 0x80, INS 0x04, P1 0, P2 network, data = path`
//! - sign: `CLA 0x80, INS 0x02, P1 0x80 on last chunk, P2 network,
//!   data = (path || message) split in 128 byte chunks`
//!
//! Every response ends with a two byte status word; `0x9000` is success.

use crate::device::types::{DeviceError, DeviceResult};
use crate::path::HdPath;

pub const CLA: u8 = 0x80;
pub const INS_SIGN: u8 = 0x02;
pub const INS_GET_PUBLIC_KEY: u8 = 0x04;
pub const P1_LAST_CHUNK: u8 = 0x80;

/// Network byte for mainnet.
pub const NETWORK_MAINNET: u8 = b'W';

/// Largest data field per sign command.
pub const CHUNK_SIZE: usize = 128;

pub const SW_OK: u16 = 0x9000;
pub const SW_USER_REJECTED: u16 = 0x6985;

/// A single command APDU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Apdu {
    pub cla: u8,
    pub ins: u8,
    pub p1: u8,
    pub p2: u8,
    pub data: Vec<u8>,
}

impl Apdu {
    /// Serialize as `CLA INS P1 P2 Lc data`.
    pub fn to_bytes(&self) -> DeviceResult<Vec<u8>> {
        let lc = u8::try_from(self.data.len())
            .map_err(|_| DeviceError::CommandTooLong(self.data.len()))?;
        let mut out = Vec::with_capacity(5 + self.data.len());
        out.extend_from_slice(&[self.cla, self.ins, self.p1, self.p2, lc]);
        out.extend_from_slice(&self.data);
        Ok(out)
    }
}

/// Command requesting the public key at `path`.
pub fn get_public_key_command(path: &HdPath, network: u8) -> Apdu {
    Apdu {
        cla: CLA,
        ins: INS_GET_PUBLIC_KEY,
        p1: 0,
        p2: network,
        data: path.to_bip32_bytes(),
    }
}

/// Commands signing `message` with the key at `path`, in send order.
pub fn sign_commands(path: &HdPath, message: &[u8], network: u8) -> Vec<Apdu> {
    let mut payload = path.to_bip32_bytes();
    payload.extend_from_slice(message);

    let chunks: Vec<&[u8]> = payload.chunks(CHUNK_SIZE).collect();
    let last = chunks.len().saturating_sub(1);
    chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| Apdu {
            cla: CLA,
            ins: INS_SIGN,
            p1: if i == last { P1_LAST_CHUNK } else { 0 },
            p2: network,
            data: chunk.to_vec(),
        })
        .collect()
}

/// Split a response into payload and status, mapping failures.
pub fn check_response(response: &[u8]) -> DeviceResult<&[u8]> {
    if response.len() < 2 {
        return Err(DeviceError::InvalidResponse(format!(
            "response too short ({} bytes)",
            response.len()
        )));
    }
    let (payload, sw) = response.split_at(response.len() - 2);
    match u16::from_be_bytes([sw[0], sw[1]]) {
        SW_OK => Ok(payload),
        SW_USER_REJECTED => Err(DeviceError::Rejected),
        other => Err(DeviceError::Status(other)),
    }
}
