//! The claim transport interface.

use alloy::primitives::Address;
use async_trait::async_trait;

use crate::blockchain::Wallet;
use crate::claim::types::{ClaimOutcome, ClaimResult, WorkflowState};

/// One way of claiming for a wallet. Implementations hold no per-wallet state.
#[async_trait]
pub trait ClaimStrategy: Send + Sync {
    /// Short name used in logs and metric labels.
    fn name(&self) -> &'static str;

    /// Drive one wallet's claim to a terminal outcome.
    async fn claim(&self, wallet: &Wallet) -> ClaimResult<ClaimOutcome>;
}

pub(crate) fn transition(strategy: &'static str, address: Address, state: WorkflowState) {
    tracing::debug!(strategy, address = %address, state = %state, "Claim state");
}
