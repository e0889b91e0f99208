//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Key file line
//!     → wallet.rs (key parsing, message signing)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → fees.rs (chain id → fee policy)
//!     → transaction.rs (build, sign, broadcast once, poll receipt)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Signed transactions are broadcast to a single endpoint, once

pub mod client;
pub mod contract;
pub mod fees;
pub mod transaction;
pub mod types;
pub mod wallet;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{BlockchainClient, ChainRpc};
pub use fees::{FeeMode, FeePolicy, FeeTable};
pub use transaction::{ContractCall, SubmitterSettings, TxSubmitter};
pub use types::{BlockchainConfig, BlockchainError, ChainId, TransactionOutcome, TransactionStatus};
pub use wallet::Wallet;

// Well-known test private key (Anvil's first account)
#[cfg(test)]
pub(crate) const TEST_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
