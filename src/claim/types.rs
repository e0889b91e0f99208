//! Claim outcomes, workflow states and errors.

use alloy::primitives::{TxHash, U256};
use std::fmt;
use thiserror::Error;

use crate::api::{ApiError, AssetId};
use crate::blockchain::BlockchainError;

/// What a successful claim produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimDetail {
    /// The relayer accepted a claim for these assets.
    Relayed { assets: Vec<AssetId> },
    /// The claim transaction was mined with status 1.
    OnChain { amount: U256, tx_hash: TxHash },
}

/// Result of one wallet's claim attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed(ClaimDetail),
    /// No eligible assets or a zero claimable amount.
    NothingToClaim,
    /// The claim ran to the end and was rejected.
    Failed { reason: String },
}

impl ClaimOutcome {
    /// `Claimed` and `NothingToClaim` both count as success.
    pub fn is_success(&self) -> bool {
        !matches!(self, ClaimOutcome::Failed { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClaimOutcome::Claimed(_) => "claimed",
            ClaimOutcome::NothingToClaim => "nothing_to_claim",
            ClaimOutcome::Failed { .. } => "failed",
        }
    }
}

/// Steps of the per-wallet workflow, logged as the claim advances.
///
/// ```text
/// relay:    Start → AssetsFetched → EligibilityChecked
///               → NothingToClaim | ChallengeIssued → Signed → Submitted → Success | Failed
/// on-chain: Start → ClaimableAmountChecked
///               → NothingToClaim | TransactionBuilt → Confirmed | Unconfirmed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Start,
    AssetsFetched,
    EligibilityChecked,
    ChallengeIssued,
    Signed,
    Submitted,
    ClaimableAmountChecked,
    TransactionBuilt,
    Confirmed,
    Unconfirmed,
    NothingToClaim,
    Success,
    Failed,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowState::Start => "start",
            WorkflowState::AssetsFetched => "assets_fetched",
            WorkflowState::EligibilityChecked => "eligibility_checked",
            WorkflowState::ChallengeIssued => "challenge_issued",
            WorkflowState::Signed => "signed",
            WorkflowState::Submitted => "submitted",
            WorkflowState::ClaimableAmountChecked => "claimable_amount_checked",
            WorkflowState::TransactionBuilt => "transaction_built",
            WorkflowState::Confirmed => "confirmed",
            WorkflowState::Unconfirmed => "unconfirmed",
            WorkflowState::NothingToClaim => "nothing_to_claim",
            WorkflowState::Success => "success",
            WorkflowState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Errors that end one wallet's claim.
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("blockchain error: {0}")]
    Blockchain(#[from] BlockchainError),
}

pub type ClaimResult<T> = Result<T, ClaimError>;
