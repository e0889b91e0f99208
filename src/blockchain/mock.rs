//! Scripted in-memory RPC for unit tests.

use alloy::primitives::{Address, Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::blockchain::client::ChainRpc;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ObservedReceipt};

pub(crate) struct MockRpc {
    chain_id: u64,
    gas_price: u128,
    priority_fee: u128,
    nonce: u64,
    gas_estimate: Mutex<u64>,
    estimate_fails: Mutex<bool>,
    call_result: Mutex<Bytes>,
    receipts: Mutex<VecDeque<BlockchainResult<Option<ObservedReceipt>>>>,
    broadcast_fails: Mutex<bool>,
    broadcasts: Mutex<Vec<Bytes>>,
    calls: Mutex<Vec<&'static str>>,
}

impl MockRpc {
    pub(crate) fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            gas_price: 1_000_000_000,
            priority_fee: 1_000,
            nonce: 7,
            gas_estimate: Mutex::new(21_000),
            estimate_fails: Mutex::new(false),
            call_result: Mutex::new(Bytes::new()),
            receipts: Mutex::new(VecDeque::new()),
            broadcast_fails: Mutex::new(false),
            broadcasts: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn set_gas_estimate(&self, gas: u64) {
        *self.gas_estimate.lock().unwrap() = gas;
    }

    pub(crate) fn fail_estimate(&self) {
        *self.estimate_fails.lock().unwrap() = true;
    }

    pub(crate) fn set_call_result(&self, data: Bytes) {
        *self.call_result.lock().unwrap() = data;
    }

    /// Queue the next receipt lookup result; an empty queue answers `Ok(None)`.
    pub(crate) fn push_receipt(&self, receipt: BlockchainResult<Option<ObservedReceipt>>) {
        self.receipts.lock().unwrap().push_back(receipt);
    }

    pub(crate) fn fail_broadcast(&self) {
        *self.broadcast_fails.lock().unwrap() = true;
    }

    pub(crate) fn broadcasts(&self) -> Vec<Bytes> {
        self.broadcasts.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, method: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|m| **m == method).count()
    }

    fn record(&self, method: &'static str) {
        self.calls.lock().unwrap().push(method);
    }
}

#[async_trait]
impl ChainRpc for MockRpc {
    async fn chain_id(&self) -> BlockchainResult<u64> {
        self.record("chain_id");
        Ok(self.chain_id)
    }

    async fn transaction_count(&self, _address: Address) -> BlockchainResult<u64> {
        self.record("transaction_count");
        Ok(self.nonce)
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        self.record("gas_price");
        Ok(self.gas_price)
    }

    async fn max_priority_fee(&self) -> BlockchainResult<u128> {
        self.record("max_priority_fee");
        Ok(self.priority_fee)
    }

    async fn estimate_gas(&self, _tx: &TransactionRequest) -> BlockchainResult<u64> {
        self.record("estimate_gas");
        if *self.estimate_fails.lock().unwrap() {
            return Err(BlockchainError::Rpc("execution reverted".to_string()));
        }
        Ok(*self.gas_estimate.lock().unwrap())
    }

    async fn call(&self, _tx: &TransactionRequest) -> BlockchainResult<Bytes> {
        self.record("call");
        Ok(self.call_result.lock().unwrap().clone())
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> BlockchainResult<TxHash> {
        self.record("send_raw_transaction");
        if *self.broadcast_fails.lock().unwrap() {
            return Err(BlockchainError::Rpc("nonce too low".to_string()));
        }
        self.broadcasts.lock().unwrap().push(Bytes::copy_from_slice(raw));
        Ok(alloy::primitives::keccak256(raw))
    }

    async fn transaction_receipt(
        &self,
        _tx_hash: TxHash,
    ) -> BlockchainResult<Option<ObservedReceipt>> {
        self.record("transaction_receipt");
        self.receipts.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}
