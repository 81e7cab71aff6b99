//! APDU exchange over an HTTP bridge.
//!
//! The bridge accepts `POST {url}/apdu` with `{"data": "<hex command>"}` and
//! answers `{"data": "<hex response incl. status word>"}`. This is the
//! protocol spoken by the Speculos emulator and by local USB relays.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::DeviceConfig;
use crate::device::apdu::{self, Apdu};
use crate::device::types::{DeviceError, DeviceResult, HardwareTransport};
use crate::path::HdPath;

#[derive(Debug, Serialize)]
struct ApduRequest {
    data: String,
}

#[derive(Debug, Deserialize)]
struct ApduResponse {
    data: String,
}

/// Hardware transport backed by an APDU bridge.
#[derive(Debug, Clone)]
pub struct ApduBridge {
    client: reqwest::Client,
    url: String,
    network: u8,
}

impl ApduBridge {
    /// Create a bridge client from configuration.
    pub fn new(config: &DeviceConfig) -> DeviceResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.confirm_timeout_secs))
            .build()
            .map_err(|e| DeviceError::Transport(e.to_string()))?;

        let network = config
            .network_byte
            .bytes()
            .next()
            .unwrap_or(apdu::NETWORK_MAINNET);

        Ok(Self {
            client,
            url: config.bridge_url.trim_end_matches('/').to_string(),
            network,
        })
    }

    async fn exchange(&self, command: &Apdu) -> DeviceResult<Vec<u8>> {
        let request = ApduRequest {
            data: hex::encode(command.to_bytes()?),
        };

        let response = self
            .client
            .post(format!("{}/apdu", self.url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    DeviceError::Disconnected(e.to_string())
                } else {
                    DeviceError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeviceError::Transport(format!("bridge returned {}", status)));
        }

        let body: ApduResponse = response
            .json()
            .await
            .map_err(|e| DeviceError::InvalidResponse(e.to_string()))?;
        let bytes = hex::decode(body.data.trim())
            .map_err(|e| DeviceError::InvalidResponse(e.to_string()))?;

        tracing::trace!(ins = command.ins, len = bytes.len(), "APDU exchanged");
        Ok(bytes)
    }
}

#[async_trait]
impl HardwareTransport for ApduBridge {
    async fn get_public_key(&self, path: &HdPath) -> DeviceResult<Vec<u8>> {
        tracing::debug!(path = %path, "Requesting public key from device");
        let response = self
            .exchange(&apdu::get_public_key_command(path, self.network))
            .await?;
        Ok(apdu::check_response(&response)?.to_vec())
    }

    async fn sign(&self, message: &[u8], path: &HdPath) -> DeviceResult<Vec<u8>> {
        tracing::info!(path = %path, bytes = message.len(), "Confirm the transaction on the device");
        let commands = apdu::sign_commands(path, message, self.network);
        let mut signature = Vec::new();
        for command in &commands {
            let response = self.exchange(command).await?;
            let payload = apdu::check_response(&response)?;
            if command.p1 == apdu::P1_LAST_CHUNK {
                signature = payload.to_vec();
            }
        }
        Ok(signature)
    }
}
