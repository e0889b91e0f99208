//! Startup orchestration.
//!
//! Config is loaded and validated first, then keys, then the API and chain
//! clients the claim strategies are assembled from. Any error here is fatal.

use alloy::primitives::Address;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::api::{ApiError, ApiTransport, BackendClient, IndexerClient};
use crate::blockchain::{BlockchainClient, BlockchainError, FeeTable, SubmitterSettings, TxSubmitter, Wallet};
use crate::claim::{ClaimStrategy, OnChainClaim, RelayClaim};
use crate::config::loader::ConfigError;
use crate::config::{ClaimMode, ClaimerConfig};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot read key file {}: {source}", .path.display())]
    KeysFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Add keys to {}", .path.display())]
    NoKeys { path: PathBuf },

    #[error("none of the keys in {} is a valid private key", .path.display())]
    NoValidKeys { path: PathBuf },

    #[error("invalid contract address: {0}")]
    InvalidAddress(String),

    #[error("API client setup failed: {0}")]
    Api(#[from] ApiError),

    #[error("blockchain client setup failed: {0}")]
    Blockchain(#[from] BlockchainError),
}

/// Non-empty, non-comment lines of the key file with their 1-based line numbers.
pub fn load_private_keys(path: &Path) -> Result<Vec<(usize, String)>, StartupError> {
    let content = std::fs::read_to_string(path).map_err(|source| StartupError::KeysFile {
        path: path.to_path_buf(),
        source,
    })?;

    let keys: Vec<(usize, String)> = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| (n, line.to_string()))
        .collect();

    if keys.is_empty() {
        return Err(StartupError::NoKeys {
            path: path.to_path_buf(),
        });
    }
    Ok(keys)
}

/// Parse every key into a wallet. Invalid keys are skipped and reported by
/// line number only.
pub fn load_wallets(path: &Path) -> Result<Vec<Wallet>, StartupError> {
    let mut wallets = Vec::new();
    for (line, key) in load_private_keys(path)? {
        match Wallet::from_private_key(&key) {
            Ok(wallet) => wallets.push(wallet),
            Err(e) => tracing::error!(line, error = %e, "Skipping invalid private key"),
        }
    }

    if wallets.is_empty() {
        return Err(StartupError::NoValidKeys {
            path: path.to_path_buf(),
        });
    }

    tracing::info!(count = wallets.len(), "Wallets loaded");
    Ok(wallets)
}

/// Clients and strategies shared by every command.
pub struct Services {
    pub backend: Arc<BackendClient>,
    pub chain: Arc<BlockchainClient>,
    pub relay: Arc<RelayClaim>,
    pub onchain: Arc<OnChainClaim<BlockchainClient>>,
}

impl Services {
    pub fn build(config: &ClaimerConfig) -> Result<Self, StartupError> {
        let transport = ApiTransport::new(&config.api, config.retry.rate_limit_pause())?;
        let indexer = Arc::new(IndexerClient::new(transport.clone(), &config.indexer)?);
        let backend = Arc::new(BackendClient::new(transport, config.api.base_url.clone())?);

        let relay = Arc::new(RelayClaim::new(
            indexer,
            backend.clone(),
            config.retry.max_rate_limit_retries,
        ));

        let chain = Arc::new(BlockchainClient::new(config.blockchain.clone())?);
        let contract: Address = config
            .blockchain
            .contract_address
            .parse()
            .map_err(|_| StartupError::InvalidAddress(config.blockchain.contract_address.clone()))?;
        let submitter = TxSubmitter::new(
            chain.clone(),
            FeeTable::from_config(&config.fees)?,
            SubmitterSettings::from_config(&config.blockchain, &config.retry),
        );
        let onchain = Arc::new(OnChainClaim::new(chain.clone(), submitter, contract));

        Ok(Self {
            backend,
            chain,
            relay,
            onchain,
        })
    }

    pub fn strategy(&self, mode: ClaimMode) -> Arc<dyn ClaimStrategy> {
        match mode {
            ClaimMode::Relay => self.relay.clone(),
            ClaimMode::Onchain => self.onchain.clone(),
        }
    }

    /// Warn when the RPC endpoint serves a different chain than configured.
    pub async fn check_chain(&self) {
        match self.chain.verify_chain_id().await {
            Ok(()) => {}
            Err(e @ BlockchainError::ChainMismatch { .. }) => {
                tracing::warn!(error = %e, "RPC endpoint is on an unexpected chain")
            }
            Err(e) => tracing::warn!(error = %e, "Could not verify chain id"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::TEST_PRIVATE_KEY;
    use std::io::Write;

    fn key_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_blank_lines_and_comments_skipped() {
        let file = key_file(&format!("# main\n\n  0x{}  \n\n", TEST_PRIVATE_KEY));
        let keys = load_private_keys(file.path()).unwrap();
        assert_eq!(keys, vec![(3, format!("0x{}", TEST_PRIVATE_KEY))]);
    }

    #[test]
    fn test_empty_key_file_is_no_keys() {
        let file = key_file("\n# nothing here\n");
        let err = load_private_keys(file.path()).unwrap_err();
        assert!(matches!(err, StartupError::NoKeys { .. }));
        assert!(err.to_string().starts_with("Add keys to "));
    }

    #[test]
    fn test_missing_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_private_keys(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, StartupError::KeysFile { .. }));
    }

    #[test]
    fn test_invalid_keys_skipped() {
        let file = key_file(&format!("not-a-key\n{}\n", TEST_PRIVATE_KEY));
        let wallets = load_wallets(file.path()).unwrap();
        assert_eq!(wallets.len(), 1);
        assert_eq!(
            wallets[0].address(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse::<Address>().unwrap()
        );
    }

    #[test]
    fn test_only_invalid_keys() {
        let file = key_file("zz\n1234\n");
        assert!(matches!(
            load_wallets(file.path()).unwrap_err(),
            StartupError::NoValidKeys { .. }
        ));
    }

    #[tokio::test]
    async fn test_services_build_with_defaults() {
        let services = Services::build(&ClaimerConfig::default()).unwrap();
        assert_eq!(services.strategy(ClaimMode::Relay).name(), "relay");
        assert_eq!(services.strategy(ClaimMode::Onchain).name(), "onchain");
    }
}
