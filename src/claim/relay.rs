//! Relayer claim flow: owned assets → eligibility → signed challenge → relayer.

use alloy::primitives::Address;
use async_trait::async_trait;
use std::sync::Arc;

use crate::api::{AssetId, AssetIndexer, ClaimBackend, ClaimSubmission, RELAYER_SUCCESS};
use crate::auth::sign_authorization;
use crate::blockchain::Wallet;
use crate::claim::strategy::{transition, ClaimStrategy};
use crate::claim::types::{ClaimDetail, ClaimOutcome, ClaimResult, WorkflowState};
use crate::resilience::retry_rate_limited;

const NAME: &str = "relay";

pub struct RelayClaim {
    indexer: Arc<dyn AssetIndexer>,
    backend: Arc<dyn ClaimBackend>,
    max_rate_limit_retries: Option<u32>,
}

impl RelayClaim {
    pub fn new(
        indexer: Arc<dyn AssetIndexer>,
        backend: Arc<dyn ClaimBackend>,
        max_rate_limit_retries: Option<u32>,
    ) -> Self {
        Self {
            indexer,
            backend,
            max_rate_limit_retries,
        }
    }

    /// Owned assets, pausing and re-listing while the indexer is rate limited.
    pub async fn owned_assets(&self, address: Address) -> ClaimResult<Vec<AssetId>> {
        let indexer = self.indexer.as_ref();
        let owned = retry_rate_limited("list_owned_assets", self.max_rate_limit_retries, move || {
            indexer.list_owned_assets(address)
        })
        .await?;
        Ok(owned)
    }

    /// The eligible subset of the wallet's assets. Makes no backend call when
    /// the wallet owns nothing.
    pub async fn eligible_assets(&self, address: Address) -> ClaimResult<Vec<AssetId>> {
        let owned = self.owned_assets(address).await?;
        transition(NAME, address, WorkflowState::AssetsFetched);
        tracing::info!(address = %address, owned = owned.len(), "Owned NFTs");

        if owned.is_empty() {
            return Ok(Vec::new());
        }

        let eligible = self.backend.check_eligibility(address, &owned).await?;
        transition(NAME, address, WorkflowState::EligibilityChecked);
        Ok(eligible)
    }
}

#[async_trait]
impl ClaimStrategy for RelayClaim {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn claim(&self, wallet: &Wallet) -> ClaimResult<ClaimOutcome> {
        let address = wallet.address();
        transition(NAME, address, WorkflowState::Start);

        let eligible = self.eligible_assets(address).await?;
        if eligible.is_empty() {
            transition(NAME, address, WorkflowState::NothingToClaim);
            tracing::info!(address = %address, "No eligible NFTs, nothing to claim");
            return Ok(ClaimOutcome::NothingToClaim);
        }
        tracing::info!(address = %address, eligible = ?eligible, "Eligible NFTs");

        let challenge = self.backend.get_nonce_and_timestamp(address).await?;
        transition(NAME, address, WorkflowState::ChallengeIssued);

        let authorization = sign_authorization(wallet, challenge).await?;
        transition(NAME, address, WorkflowState::Signed);

        let submission = ClaimSubmission {
            authorization,
            asset_ids: eligible.clone(),
        };
        let message = self.backend.submit_claim(submission).await?;
        transition(NAME, address, WorkflowState::Submitted);

        if message == RELAYER_SUCCESS {
            transition(NAME, address, WorkflowState::Success);
            tracing::info!(address = %address, "Relayer accepted the claim");
            Ok(ClaimOutcome::Claimed(ClaimDetail::Relayed { assets: eligible }))
        } else {
            transition(NAME, address, WorkflowState::Failed);
            Ok(ClaimOutcome::Failed {
                reason: format!("relayer answered {:?}", message),
            })
        }
    }
}
