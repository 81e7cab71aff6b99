//! Configuration schema definitions.
//!
//! All sections derive Serde traits and default every field, so an empty
//! file is a valid mainnet configuration.

use serde::{Deserialize, Serialize};

use crate::chain::TGAS;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StakerConfig {
    /// Node, index service and lockup naming.
    pub network: NetworkConfig,

    /// Where the account registry lives.
    pub storage: StorageConfig,

    /// Hardware device bridge.
    pub device: DeviceConfig,

    /// Path range scanning limits.
    pub scan: ScanConfig,

    /// Gas budgets for signed lockup calls.
    pub gas: GasConfig,

    /// Retry policy for read-only RPC calls.
    pub retries: RetryConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Chain network configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Network id (e.g. "mainnet").
    pub network_id: String,

    /// JSON-RPC endpoint URL.
    pub node_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Base URL of the public key → accounts index.
    pub helper_url: String,

    /// Parent account of all lockup accounts.
    pub lockup_base: String,

    /// Per-request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            network_id: "mainnet".to_string(),
            node_url: "https://rpc.mainnet.near.org".to_string(),
            failover_urls: Vec::new(),
            helper_url: "https://helper.mainnet.near.org".to_string(),
            lockup_base: "lockup.near".to_string(),
            rpc_timeout_secs: 10,
        }
    }
}

/// Registry storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file backing the key-value store.
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "staker-accounts.json".to_string(),
        }
    }
}

/// Hardware device configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// APDU bridge base URL.
    pub bridge_url: String,

    /// Network byte sent as P2 ("W" for mainnet).
    pub network_byte: String,

    /// How long to wait for on-device confirmation, in seconds.
    pub confirm_timeout_secs: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            bridge_url: "http://127.0.0.1:5000".to_string(),
            network_byte: "W".to_string(),
            confirm_timeout_secs: 120,
        }
    }
}

/// Scan configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Largest number of paths a single scan may expand to.
    pub max_paths: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { max_paths: 1_000 }
    }
}

/// Gas budgets in gas units.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GasConfig {
    pub select_staking_pool: u64,
    pub deposit_and_stake: u64,
    pub unstake: u64,
    pub withdraw_all_from_staking_pool: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            select_staking_pool: 100 * TGAS,
            deposit_and_stake: 200 * TGAS,
            unstake: 200 * TGAS,
            withdraw_all_from_staking_pool: 175 * TGAS,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries.
    pub enabled: bool,

    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_mainnet() {
        let config: StakerConfig = toml::from_str("").unwrap();
        assert_eq!(config.network.network_id, "mainnet");
        assert_eq!(config.network.lockup_base, "lockup.near");
        assert_eq!(config.gas.deposit_and_stake, 200_000_000_000_000);
        assert_eq!(config.gas.select_staking_pool, 100_000_000_000_000);
    }

    #[test]
    fn test_partial_sections() {
        let config: StakerConfig = toml::from_str(
            r#"
            [network]
            node_url = "http://localhost:3030"
            failover_urls = ["http://localhost:3031"]

            [scan]
            max_paths = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.network.node_url, "http://localhost:3030");
        assert_eq!(config.network.helper_url, "https://helper.mainnet.near.org");
        assert_eq!(config.network.failover_urls.len(), 1);
        assert_eq!(config.scan.max_paths, 10);
        assert_eq!(config.retries.max_attempts, 3);
    }
}
