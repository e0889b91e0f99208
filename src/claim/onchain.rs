//! Direct contract claim flow: claimable amount → claim() transaction → receipt.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use std::sync::Arc;

use crate::blockchain::contract::{claim_calldata, decode_tokens_claimable, tokens_claimable_calldata};
use crate::blockchain::types::BlockchainResult;
use crate::blockchain::{BlockchainError, ChainRpc, ContractCall, TxSubmitter, Wallet};
use crate::claim::strategy::{transition, ClaimStrategy};
use crate::claim::types::{ClaimDetail, ClaimOutcome, ClaimResult, WorkflowState};

const NAME: &str = "onchain";

pub struct OnChainClaim<R> {
    rpc: Arc<R>,
    submitter: TxSubmitter<R>,
    contract: Address,
}

impl<R: ChainRpc> OnChainClaim<R> {
    pub fn new(rpc: Arc<R>, submitter: TxSubmitter<R>, contract: Address) -> Self {
        Self {
            rpc,
            submitter,
            contract,
        }
    }

    /// Tokens the contract reports as claimable by `account`.
    pub async fn claimable_amount(&self, account: Address) -> BlockchainResult<U256> {
        let request = TransactionRequest::default()
            .with_to(self.contract)
            .with_input(tokens_claimable_calldata(account));
        let data = self.rpc.call(&request).await?;
        decode_tokens_claimable(&data)
    }
}

#[async_trait]
impl<R: ChainRpc + 'static> ClaimStrategy for OnChainClaim<R> {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn claim(&self, wallet: &Wallet) -> ClaimResult<ClaimOutcome> {
        let address = wallet.address();
        transition(NAME, address, WorkflowState::Start);

        let amount = self.claimable_amount(address).await?;
        transition(NAME, address, WorkflowState::ClaimableAmountChecked);
        tracing::info!(address = %address, amount = %amount, "Claimable tokens");

        if amount.is_zero() {
            transition(NAME, address, WorkflowState::NothingToClaim);
            tracing::info!(address = %address, "Nothing to claim");
            return Ok(ClaimOutcome::NothingToClaim);
        }

        let call = ContractCall::new(self.contract, claim_calldata());
        let tx = self.submitter.build(&call, wallet).await?;
        transition(NAME, address, WorkflowState::TransactionBuilt);

        let tx_hash = self.submitter.broadcast(tx).await?;
        let outcome = match self.submitter.wait_for_receipt(tx_hash).await {
            Ok(outcome) => outcome,
            Err(e @ BlockchainError::ConfirmationTimeout { .. }) => {
                transition(NAME, address, WorkflowState::Unconfirmed);
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };
        transition(NAME, address, WorkflowState::Confirmed);

        if outcome.is_success() {
            Ok(ClaimOutcome::Claimed(ClaimDetail::OnChain {
                amount,
                tx_hash: outcome.tx_hash,
            }))
        } else {
            Ok(ClaimOutcome::Failed {
                reason: format!("transaction {} reverted", outcome.tx_hash),
            })
        }
    }
}
