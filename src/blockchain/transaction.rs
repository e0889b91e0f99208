//! Transaction building, signing, and confirmation monitoring.
//!
//! # Responsibilities
//! - Build contract-call transactions with per-chain fees and gas estimation
//! - Sign locally and broadcast exactly once
//! - Poll for the receipt with a bounded number of lookups

use alloy::eips::eip2718::Encodable2718;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::blockchain::client::ChainRpc;
use crate::blockchain::fees::{format_gwei, FeeMode, FeeParams, FeeTable, NetworkFees};
use crate::blockchain::types::{
    BlockchainError, BlockchainResult, TransactionOutcome, TransactionStatus,
};
use crate::blockchain::wallet::Wallet;
use crate::config::{BlockchainConfig, RetryConfig};
use crate::observability::metrics;

/// A contract invocation to be wrapped in a transaction.
#[derive(Debug, Clone)]
pub struct ContractCall {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

impl ContractCall {
    pub fn new(to: Address, data: Bytes) -> Self {
        Self {
            to,
            data,
            value: U256::ZERO,
        }
    }
}

/// A signed transaction ready for broadcast.
///
/// Consumed by [`TxSubmitter::broadcast`], so one built transaction can
/// reach the network at most once.
#[derive(Debug)]
pub struct ClaimTransaction {
    pub tx_hash: TxHash,
    pub to: Address,
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_limit: u64,
    pub fees: FeeParams,
    raw: Bytes,
}

/// Submitter settings derived from configuration.
#[derive(Debug, Clone)]
pub struct SubmitterSettings {
    pub fee_mode: FeeMode,
    /// Fixed gas limit; estimated with 5% headroom when absent.
    pub gas_limit: Option<u64>,
    pub explorer_url: String,
    pub first_poll_delay: Duration,
    pub poll_retry_delay: Duration,
    pub max_receipt_attempts: u32,
}

impl SubmitterSettings {
    pub fn from_config(blockchain: &BlockchainConfig, retry: &RetryConfig) -> Self {
        Self {
            fee_mode: if blockchain.eip1559 { FeeMode::Eip1559 } else { FeeMode::Legacy },
            gas_limit: blockchain.gas_limit,
            explorer_url: blockchain.explorer_url.clone(),
            first_poll_delay: Duration::from_secs(retry.first_poll_delay_secs),
            poll_retry_delay: Duration::from_secs(retry.poll_retry_delay_secs),
            max_receipt_attempts: retry.max_receipt_attempts,
        }
    }
}

/// Builds, signs, broadcasts and confirms transactions.
pub struct TxSubmitter<R> {
    rpc: Arc<R>,
    fees: FeeTable,
    settings: SubmitterSettings,
}

impl<R: ChainRpc> TxSubmitter<R> {
    /// Create a new transaction submitter.
    pub fn new(rpc: Arc<R>, fees: FeeTable, settings: SubmitterSettings) -> Self {
        Self { rpc, fees, settings }
    }

    /// Build, sign, broadcast and wait for the receipt.
    ///
    /// Success iff the receipt status is 1. A transaction that never shows a
    /// receipt within the configured lookups yields `ConfirmationTimeout`.
    pub async fn submit_and_confirm(
        &self,
        call: &ContractCall,
        wallet: &Wallet,
    ) -> BlockchainResult<TransactionOutcome> {
        let tx = self.build(call, wallet).await?;
        let tx_hash = self.broadcast(tx).await?;
        self.wait_for_receipt(tx_hash).await
    }

    /// Build and sign a transaction for `call` from `wallet`.
    pub async fn build(&self, call: &ContractCall, wallet: &Wallet) -> BlockchainResult<ClaimTransaction> {
        let from = wallet.address();
        let chain_id = self.rpc.chain_id().await?;
        let nonce = self.rpc.transaction_count(from).await?;
        let fees = self.fees_for(chain_id).await?;

        let mut request = TransactionRequest::default()
            .with_from(from)
            .with_to(call.to)
            .with_input(call.data.clone())
            .with_value(call.value)
            .with_nonce(nonce)
            .with_chain_id(chain_id);

        match fees {
            FeeParams::Legacy { gas_price } => request.set_gas_price(gas_price),
            FeeParams::Eip1559 {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            } => {
                request.set_max_fee_per_gas(max_fee_per_gas);
                request.set_max_priority_fee_per_gas(max_priority_fee_per_gas);
            }
        }

        let gas_limit = match self.settings.gas_limit {
            Some(limit) => limit,
            None => {
                let estimate = self.rpc.estimate_gas(&request).await?;
                estimate.saturating_mul(105) / 100
            }
        };
        request.set_gas_limit(gas_limit);

        let envelope = request
            .build(&wallet.network_wallet())
            .await
            .map_err(|e| BlockchainError::Build(format!("Signing failed: {}", e)))?;

        tracing::debug!(
            from = %from,
            to = %call.to,
            chain_id,
            nonce,
            gas_limit,
            "Transaction signed"
        );

        Ok(ClaimTransaction {
            tx_hash: *envelope.tx_hash(),
            to: call.to,
            chain_id,
            nonce,
            gas_limit,
            fees,
            raw: envelope.encoded_2718().into(),
        })
    }

    /// Broadcast a signed transaction. Consumes it.
    pub async fn broadcast(&self, tx: ClaimTransaction) -> BlockchainResult<TxHash> {
        let tx_hash = self.rpc.send_raw_transaction(&tx.raw).await?;
        metrics::record_broadcast();

        if tx_hash != tx.tx_hash {
            tracing::warn!(
                expected = %tx.tx_hash,
                returned = %tx_hash,
                "Node returned a different transaction hash"
            );
        }

        tracing::info!("Tx: {}tx/{}", self.settings.explorer_url, tx_hash);
        Ok(tx_hash)
    }

    /// Current status of a broadcast transaction.
    pub async fn check_status(&self, tx_hash: TxHash) -> BlockchainResult<TransactionOutcome> {
        let outcome = match self.rpc.transaction_receipt(tx_hash).await? {
            Some(receipt) => TransactionOutcome {
                tx_hash,
                status: receipt.status(tx_hash)?,
                block_number: receipt.block_number,
                gas_used: Some(receipt.gas_used),
            },
            None => TransactionOutcome {
                tx_hash,
                status: TransactionStatus::Pending,
                block_number: None,
                gas_used: None,
            },
        };
        Ok(outcome)
    }

    /// Wait for a transaction to be mined.
    ///
    /// Sleeps `first_poll_delay`, then looks the receipt up at most
    /// `max_receipt_attempts` times, `poll_retry_delay` apart. Lookup errors
    /// and missing receipts both count as a failed attempt.
    pub async fn wait_for_receipt(&self, tx_hash: TxHash) -> BlockchainResult<TransactionOutcome> {
        sleep(self.settings.first_poll_delay).await;

        let mut attempts = 0;
        loop {
            attempts += 1;

            match self.check_status(tx_hash).await {
                Ok(outcome) if outcome.status == TransactionStatus::Pending => {
                    metrics::record_receipt_poll("pending");
                    tracing::debug!(tx_hash = %tx_hash, attempt = attempts, "Transaction pending");
                }
                Ok(outcome) => {
                    metrics::record_receipt_poll("found");
                    tracing::info!(
                        tx_hash = %tx_hash,
                        status = ?outcome.status,
                        block_number = ?outcome.block_number,
                        gas_used = ?outcome.gas_used,
                        "Tx status"
                    );
                    return Ok(outcome);
                }
                Err(e @ BlockchainError::ProtocolViolation { .. }) => return Err(e),
                Err(e) => {
                    metrics::record_receipt_poll("error");
                    tracing::warn!(tx_hash = %tx_hash, attempt = attempts, error = %e, "Receipt lookup failed");
                }
            }

            if attempts >= self.settings.max_receipt_attempts {
                return Err(BlockchainError::ConfirmationTimeout { tx_hash, attempts });
            }

            tracing::info!(tx_hash = %tx_hash, "Still trying to get tx status");
            sleep(self.settings.poll_retry_delay).await;
        }
    }

    async fn fees_for(&self, chain_id: u64) -> BlockchainResult<FeeParams> {
        let policy = self.fees.policy_for(chain_id);
        let mode = self.settings.fee_mode;

        let network = NetworkFees {
            gas_price: self.rpc.gas_price().await?,
            suggested_priority_fee: if policy.needs_suggested_priority(mode) {
                Some(self.rpc.max_priority_fee().await?)
            } else {
                None
            },
        };

        let fees = policy.compute(mode, &network, &mut rand::thread_rng())?;

        match fees {
            FeeParams::Legacy { gas_price } => {
                tracing::debug!(chain_id, gas_price_gwei = %format_gwei(gas_price), "Legacy fees");
            }
            FeeParams::Eip1559 {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            } => {
                tracing::debug!(
                    chain_id,
                    max_fee_gwei = %format_gwei(max_fee_per_gas),
                    priority_fee_gwei = %format_gwei(max_priority_fee_per_gas),
                    "EIP-1559 fees"
                );
            }
        }

        Ok(fees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::fees::ZKSYNC_ERA;
    use crate::blockchain::mock::MockRpc;
    use crate::blockchain::types::ObservedReceipt;
    use crate::blockchain::TEST_PRIVATE_KEY;
    use alloy::consensus::Eip658Value;
    use alloy::primitives::B256;

    fn settings(gas_limit: Option<u64>) -> SubmitterSettings {
        SubmitterSettings {
            fee_mode: FeeMode::Eip1559,
            gas_limit,
            explorer_url: "https://basescan.org/".to_string(),
            first_poll_delay: Duration::from_secs(20),
            poll_retry_delay: Duration::from_secs(10),
            max_receipt_attempts: 5,
        }
    }

    fn submitter(rpc: &Arc<MockRpc>, gas_limit: Option<u64>) -> TxSubmitter<MockRpc> {
        TxSubmitter::new(rpc.clone(), FeeTable::builtin(), settings(gas_limit))
    }

    fn wallet() -> Wallet {
        Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap()
    }

    fn call() -> ContractCall {
        ContractCall::new(Address::repeat_byte(0x32), Bytes::from_static(&[0x4e, 0x71, 0xd9, 0x2d]))
    }

    fn receipt(success: bool) -> ObservedReceipt {
        ObservedReceipt {
            status: Eip658Value::Eip658(success),
            block_number: Some(100),
            gas_used: 50_000,
        }
    }

    #[tokio::test]
    async fn test_build_estimates_gas_with_headroom() {
        let rpc = Arc::new(MockRpc::new(8453));
        rpc.set_gas_estimate(100_000);

        let tx = submitter(&rpc, None).build(&call(), &wallet()).await.unwrap();

        assert_eq!(tx.gas_limit, 105_000);
        assert_eq!(tx.nonce, 7);
        assert_eq!(tx.chain_id, 8453);
        assert_eq!(
            tx.fees,
            FeeParams::Eip1559 {
                max_fee_per_gas: 1_050_000_000 + 1_000,
                max_priority_fee_per_gas: 1_000,
            }
        );
        assert_eq!(rpc.count("estimate_gas"), 1);
        // building does not broadcast
        assert_eq!(rpc.count("send_raw_transaction"), 0);
    }

    #[tokio::test]
    async fn test_explicit_gas_limit_skips_estimation() {
        let rpc = Arc::new(MockRpc::new(8453));

        let tx = submitter(&rpc, Some(250_000)).build(&call(), &wallet()).await.unwrap();

        assert_eq!(tx.gas_limit, 250_000);
        assert_eq!(rpc.count("estimate_gas"), 0);
    }

    #[tokio::test]
    async fn test_fixed_priority_chain_skips_suggestion() {
        let rpc = Arc::new(MockRpc::new(ZKSYNC_ERA));

        let tx = submitter(&rpc, Some(1)).build(&call(), &wallet()).await.unwrap();

        assert_eq!(rpc.count("max_priority_fee"), 0);
        assert!(matches!(
            tx.fees,
            FeeParams::Eip1559 { max_priority_fee_per_gas: 1_000_000, .. }
        ));
    }

    #[tokio::test]
    async fn test_broadcast_sends_signed_bytes_once() {
        let rpc = Arc::new(MockRpc::new(8453));
        let submitter = submitter(&rpc, Some(60_000));

        let tx = submitter.build(&call(), &wallet()).await.unwrap();
        let expected_hash = tx.tx_hash;
        let hash = submitter.broadcast(tx).await.unwrap();

        assert_eq!(hash, expected_hash);
        assert_eq!(rpc.broadcasts().len(), 1);
        // EIP-1559 envelopes start with type byte 0x02
        assert_eq!(rpc.broadcasts()[0][0], 0x02);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_receipt() {
        let rpc = Arc::new(MockRpc::new(8453));
        rpc.push_receipt(Ok(None));
        rpc.push_receipt(Ok(Some(receipt(true))));

        let started = tokio::time::Instant::now();
        let outcome = submitter(&rpc, Some(60_000))
            .submit_and_confirm(&call(), &wallet())
            .await
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.block_number, Some(100));
        assert_eq!(outcome.gas_used, Some(50_000));
        assert_eq!(rpc.count("transaction_receipt"), 2);
        assert_eq!(started.elapsed(), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reverted_receipt_is_failure() {
        let rpc = Arc::new(MockRpc::new(8453));
        rpc.push_receipt(Ok(Some(receipt(false))));

        let outcome = submitter(&rpc, Some(60_000))
            .submit_and_confirm(&call(), &wallet())
            .await
            .unwrap();

        assert_eq!(outcome.status, TransactionStatus::Failed);
        assert!(!outcome.is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn test_five_failed_lookups_time_out() {
        let rpc = Arc::new(MockRpc::new(8453));
        for _ in 0..10 {
            rpc.push_receipt(Err(BlockchainError::Rpc("connection reset".to_string())));
        }

        let started = tokio::time::Instant::now();
        let err = submitter(&rpc, Some(60_000))
            .wait_for_receipt(TxHash::repeat_byte(1))
            .await
            .unwrap_err();

        assert!(matches!(err, BlockchainError::ConfirmationTimeout { attempts: 5, .. }));
        // no sixth lookup
        assert_eq!(rpc.count("transaction_receipt"), 5);
        // 20s initial wait plus four 10s retry pauses
        assert_eq!(started.elapsed(), Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_post_state_receipt_is_protocol_violation() {
        let rpc = Arc::new(MockRpc::new(8453));
        rpc.push_receipt(Ok(Some(ObservedReceipt {
            status: Eip658Value::PostState(B256::repeat_byte(9)),
            block_number: Some(1),
            gas_used: 0,
        })));

        let err = submitter(&rpc, Some(60_000))
            .wait_for_receipt(TxHash::repeat_byte(1))
            .await
            .unwrap_err();

        assert!(matches!(err, BlockchainError::ProtocolViolation { .. }));
        assert_eq!(rpc.count("transaction_receipt"), 1);
    }

    #[tokio::test]
    async fn test_broadcast_error_propagates() {
        let rpc = Arc::new(MockRpc::new(8453));
        rpc.fail_broadcast();
        let submitter = submitter(&rpc, Some(60_000));

        let tx = submitter.build(&call(), &wallet()).await.unwrap();
        assert!(submitter.broadcast(tx).await.is_err());
        assert_eq!(rpc.count("transaction_receipt"), 0);
    }
}
