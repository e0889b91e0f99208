//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the claimer.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::blockchain::fees::FeePolicy;

/// Root configuration for the claimer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClaimerConfig {
    /// Backend claim API (eligibility, nonce, relayer).
    pub api: ApiConfig,

    /// NFT indexing provider.
    pub indexer: IndexerConfig,

    /// Blockchain RPC and claim contract settings.
    pub blockchain: BlockchainConfig,

    /// Per-chain fee policy overrides.
    pub fees: FeeConfig,

    /// Pauses and bounded retries.
    pub retry: RetryConfig,

    /// Inter-wallet scheduling.
    pub schedule: ScheduleConfig,

    /// Input and output files.
    pub files: FilesConfig,

    /// Default claim flow.
    pub claim: ClaimConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Backend claim API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base path all backend operations are appended to.
    pub base_url: String,

    /// `Origin` header sent with every request.
    pub origin: String,

    /// `Referer` header sent with every request.
    pub referer: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://basedevo.fun/api/".to_string(),
            origin: "https://basedevo.fun".to_string(),
            referer: "https://basedevo.fun/".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// NFT indexing provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Provider base URL (without the API key segment).
    pub url: String,

    /// Provider API key, appended as the last path segment.
    pub api_key: String,

    /// NFT collection whose tokens grant eligibility.
    pub collection_address: String,

    /// Page size requested from the provider.
    pub page_size: u32,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            url: "https://eth-mainnet.g.alchemy.com/v2".to_string(),
            api_key: String::new(),
            collection_address: "0xD4307E0acD12CF46fD6cf93BC264f5D5D1598792".to_string(),
            page_size: 100,
        }
    }
}

/// Blockchain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Expected chain ID (8453 for Base mainnet).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Block explorer base URL, used to log transaction links.
    pub explorer_url: String,

    /// Address of the claim contract.
    pub contract_address: String,

    /// Use EIP-1559 fee fields instead of a legacy gas price.
    pub eip1559: bool,

    /// Fixed gas limit; estimated from the transaction when absent.
    pub gas_limit: Option<u64>,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://mainnet.base.org".to_string(),
            failover_urls: Vec::new(),
            chain_id: 8453,
            rpc_timeout_secs: 10,
            explorer_url: "https://basescan.org/".to_string(),
            contract_address: "0x32E0f9d26D1e33625742A52620cC76C1130efde6".to_string(),
            eip1559: true,
            gas_limit: None,
        }
    }
}

/// Fee policy overrides keyed by chain id.
///
/// Entries are merged over the built-in table, so a chain listed here
/// replaces its default policy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FeeConfig {
    pub overrides: HashMap<String, FeePolicy>,
}

/// Pause and retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Pause after the indexer answers 429, in seconds.
    pub rate_limit_pause_secs: u64,

    /// Give up on a rate-limited step after this many pauses (unbounded when absent).
    pub max_rate_limit_retries: Option<u32>,

    /// Delay before the first receipt lookup, in seconds.
    pub first_poll_delay_secs: u64,

    /// Delay between receipt lookups, in seconds.
    pub poll_retry_delay_secs: u64,

    /// Receipt lookups before the transaction is declared unconfirmed.
    pub max_receipt_attempts: u32,
}

impl RetryConfig {
    pub fn rate_limit_pause(&self) -> Duration {
        Duration::from_secs(self.rate_limit_pause_secs)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            rate_limit_pause_secs: 60,
            max_rate_limit_retries: None,
            first_poll_delay_secs: 20,
            poll_retry_delay_secs: 10,
            max_receipt_attempts: 5,
        }
    }
}

/// Inter-wallet scheduling.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Lower bound of the random sleep between wallets, in seconds.
    pub sleep_min_secs: u64,

    /// Upper bound of the random sleep between wallets, in seconds.
    pub sleep_max_secs: u64,

    /// Shuffle wallet order before the run.
    pub shuffle: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            sleep_min_secs: 30,
            sleep_max_secs: 90,
            shuffle: true,
        }
    }
}

/// Input and output file locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Private keys, one per line.
    pub keys_file: String,

    /// Append-only log of wallets whose claim failed.
    pub failed_log: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            keys_file: "files/private_keys.txt".to_string(),
            failed_log: "files/failed_wallets.txt".to_string(),
        }
    }
}

/// Which claim transport to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ClaimMode {
    /// Sign an authorization and let the backend relayer claim.
    #[default]
    Relay,
    /// Call the claim contract directly.
    Onchain,
}

impl ClaimMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimMode::Relay => "relay",
            ClaimMode::Onchain => "onchain",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClaimConfig {
    pub mode: ClaimMode,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Directory for the daily log file; stderr only when absent.
    pub log_dir: Option<String>,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: Some("logs".to_string()),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClaimerConfig::default();
        assert_eq!(config.retry.rate_limit_pause_secs, 60);
        assert_eq!(config.retry.first_poll_delay_secs, 20);
        assert_eq!(config.retry.poll_retry_delay_secs, 10);
        assert_eq!(config.retry.max_receipt_attempts, 5);
        assert_eq!(config.api.origin, "https://basedevo.fun");
        assert_eq!(config.claim.mode, ClaimMode::Relay);
    }

    #[test]
    fn test_partial_toml() {
        let config: ClaimerConfig = toml::from_str(
            r#"
            [schedule]
            sleep_min_secs = 5
            sleep_max_secs = 10

            [claim]
            mode = "onchain"

            [fees.overrides.56]
            policy = "legacy_multiplier"
            percent = 120
            "#,
        )
        .unwrap();

        assert_eq!(config.schedule.sleep_min_secs, 5);
        assert!(config.schedule.shuffle);
        assert_eq!(config.claim.mode, ClaimMode::Onchain);
        assert_eq!(
            config.fees.overrides.get("56"),
            Some(&FeePolicy::LegacyMultiplier { percent: 120 })
        );
        // untouched sections keep their defaults
        assert_eq!(config.blockchain.chain_id, 8453);
    }
}
