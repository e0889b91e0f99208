//! Claim orchestration.
//!
//! # Data Flow
//! ```text
//! runner.rs (wallet order, pacing, failure log, summary)
//!     → strategy.rs (ClaimStrategy)
//!         → relay.rs   owned → eligible → challenge → signature → relayer
//!         → onchain.rs claimable amount → claim() tx → receipt
//! ```
//!
//! An empty eligible set or a zero claimable amount ends the wallet as
//! `NothingToClaim` before any challenge, signature or transaction.

pub mod failure_log;
pub mod onchain;
pub mod relay;
pub mod runner;
pub mod strategy;
pub mod types;

pub use failure_log::FailureLog;
pub use onchain::OnChainClaim;
pub use relay::RelayClaim;
pub use runner::{ClaimRunner, RunSummary};
pub use strategy::ClaimStrategy;
pub use types::{ClaimDetail, ClaimError, ClaimOutcome, ClaimResult, WorkflowState};
