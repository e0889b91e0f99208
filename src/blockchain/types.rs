//! Chain-specific types and error definitions.

use alloy::consensus::Eip658Value;
use alloy::primitives::TxHash;
use thiserror::Error;

// Re-export BlockchainConfig from config module to avoid duplication
pub use crate::config::schema::BlockchainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was broadcast but no receipt could be obtained.
    #[error("Transaction {tx_hash} not confirmed after {attempts} receipt lookups")]
    ConfirmationTimeout { tx_hash: TxHash, attempts: u32 },

    /// Receipt carried a status outside the EIP-658 success/failure pair.
    #[error("Protocol violation for {tx_hash}: {detail}")]
    ProtocolViolation { tx_hash: TxHash, detail: String },

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Transaction could not be assembled or signed.
    #[error("Transaction build error: {0}")]
    Build(String),

    /// Contract call returned data that does not match the ABI.
    #[error("ABI decode error: {0}")]
    Decode(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Observed on-chain state of a broadcast transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    /// No receipt yet.
    Pending,
    /// Mined with status 1.
    Success,
    /// Mined with status 0 (reverted).
    Failed,
}

/// The parts of a receipt the submitter inspects.
#[derive(Debug, Clone)]
pub struct ObservedReceipt {
    pub status: Eip658Value,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

impl ObservedReceipt {
    /// Map the receipt status onto the success/failure pair.
    ///
    /// Pre-Byzantium post-state roots carry no status code and are
    /// reported as a protocol violation.
    pub fn status(&self, tx_hash: TxHash) -> BlockchainResult<TransactionStatus> {
        match self.status {
            Eip658Value::Eip658(true) => Ok(TransactionStatus::Success),
            Eip658Value::Eip658(false) => Ok(TransactionStatus::Failed),
            Eip658Value::PostState(root) => Err(BlockchainError::ProtocolViolation {
                tx_hash,
                detail: format!("receipt has post-state root {} instead of a status code", root),
            }),
        }
    }
}

/// Final result of a submitted and polled transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutcome {
    pub tx_hash: TxHash,
    pub status: TransactionStatus,
    pub block_number: Option<u64>,
    pub gas_used: Option<u64>,
}

impl TransactionOutcome {
    pub fn is_success(&self) -> bool {
        self.status == TransactionStatus::Success
    }
}
