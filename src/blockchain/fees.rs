//! Per-chain fee policies.
//!
//! Most chains take the node's suggestions as-is. A handful need fixed or
//! scaled values to get transactions mined reliably; those live in a
//! [`FeeTable`] keyed by chain id so new chains are added as data.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::config::FeeConfig;

pub const BNB_CHAIN: u64 = 56;
pub const FANTOM: u64 = 250;
pub const ZKSYNC_ERA: u64 = 324;
pub const MOONBEAM: u64 = 1284;
pub const MOONRIVER: u64 = 1285;
pub const ARBITRUM_NOVA: u64 = 42170;

const GWEI: u128 = 1_000_000_000;

/// Which fee fields a transaction carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeMode {
    Legacy,
    Eip1559,
}

/// How fees are derived for one chain.
///
/// Legacy variants only apply in legacy mode and EIP-1559 variants only in
/// EIP-1559 mode; a mismatch falls back to the node's suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum FeePolicy {
    /// Use the node's suggested values.
    Default,
    /// Random gas price in `[min_gwei, max_gwei]`, rounded to 0.1 gwei.
    LegacyFixedRange { min_gwei: f64, max_gwei: f64 },
    /// Suggested gas price scaled by `percent`.
    LegacyMultiplier { percent: u32 },
    /// Fixed priority fee in wei.
    Eip1559FixedPriority { priority_wei: u64 },
    /// Priority fee of `base / divisor`.
    Eip1559DerivedPriority { divisor: u64 },
    /// Suggested priority fee, base fee scaled by `percent`.
    Eip1559ScaledBase { percent: u32 },
}

/// Network fee readings the policies work from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkFees {
    /// `eth_gasPrice`, used as the base fee.
    pub gas_price: u128,
    /// `eth_maxPriorityFeePerGas`, fetched only when a policy needs it.
    pub suggested_priority_fee: Option<u128>,
}

/// Fee fields to put on a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeParams {
    Legacy {
        gas_price: u128,
    },
    Eip1559 {
        max_fee_per_gas: u128,
        max_priority_fee_per_gas: u128,
    },
}

impl FeePolicy {
    /// Check the policy parameters, describing the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            FeePolicy::LegacyFixedRange { min_gwei, max_gwei } => {
                if !min_gwei.is_finite() || !max_gwei.is_finite() {
                    return Err(format!("gas price range {}..{} gwei is not finite", min_gwei, max_gwei));
                }
                if *min_gwei <= 0.0 {
                    return Err(format!("min_gwei must be > 0, got {}", min_gwei));
                }
                if min_gwei > max_gwei {
                    return Err(format!("gas price range {}..{} gwei is empty", min_gwei, max_gwei));
                }
                Ok(())
            }
            FeePolicy::LegacyMultiplier { percent } | FeePolicy::Eip1559ScaledBase { percent } => {
                if *percent == 0 {
                    return Err("percent must be > 0".to_string());
                }
                Ok(())
            }
            FeePolicy::Eip1559DerivedPriority { divisor } => {
                if *divisor == 0 {
                    return Err("divisor must be > 0".to_string());
                }
                Ok(())
            }
            FeePolicy::Default | FeePolicy::Eip1559FixedPriority { .. } => Ok(()),
        }
    }

    /// Whether computing fees in `mode` needs the node's priority fee suggestion.
    pub fn needs_suggested_priority(&self, mode: FeeMode) -> bool {
        mode == FeeMode::Eip1559
            && !matches!(
                self,
                FeePolicy::Eip1559FixedPriority { .. } | FeePolicy::Eip1559DerivedPriority { .. }
            )
    }

    pub fn compute<R: Rng>(
        &self,
        mode: FeeMode,
        network: &NetworkFees,
        rng: &mut R,
    ) -> BlockchainResult<FeeParams> {
        self.validate().map_err(BlockchainError::Build)?;
        match mode {
            FeeMode::Eip1559 => self.eip1559(network),
            FeeMode::Legacy => self.legacy(network, rng),
        }
    }

    fn eip1559(&self, network: &NetworkFees) -> BlockchainResult<FeeParams> {
        let mut base_fee = network.gas_price;

        let priority_fee = match self {
            FeePolicy::Eip1559FixedPriority { priority_wei } => *priority_wei as u128,
            FeePolicy::Eip1559DerivedPriority { divisor } => base_fee / *divisor as u128,
            _ => network.suggested_priority_fee.ok_or_else(|| {
                BlockchainError::Build("node did not provide a priority fee suggestion".to_string())
            })?,
        };

        if let FeePolicy::Eip1559ScaledBase { percent } = self {
            base_fee = scale(base_fee, *percent);
        }

        // 5% headroom over the current base fee
        let max_fee_per_gas = scale(base_fee, 105).saturating_add(priority_fee);

        Ok(FeeParams::Eip1559 {
            max_fee_per_gas,
            max_priority_fee_per_gas: priority_fee,
        })
    }

    fn legacy<R: Rng>(&self, network: &NetworkFees, rng: &mut R) -> BlockchainResult<FeeParams> {
        let gas_price = match self {
            FeePolicy::LegacyFixedRange { min_gwei, max_gwei } => {
                let low = (min_gwei * 10.0).round() as u64;
                let high = (max_gwei * 10.0).round() as u64;
                let tenths = rng.gen_range(low..=high);
                tenths as u128 * GWEI / 10
            }
            FeePolicy::LegacyMultiplier { percent } => scale(network.gas_price, *percent),
            _ => network.gas_price,
        };

        Ok(FeeParams::Legacy { gas_price })
    }
}

fn scale(value: u128, percent: u32) -> u128 {
    value.saturating_mul(percent as u128) / 100
}

/// Chain id → fee policy lookup.
#[derive(Debug, Clone)]
pub struct FeeTable {
    policies: HashMap<u64, FeePolicy>,
}

static DEFAULT_POLICY: FeePolicy = FeePolicy::Default;

impl FeeTable {
    /// Policies for the chains known to need special handling.
    pub fn builtin() -> Self {
        let policies = HashMap::from([
            (ZKSYNC_ERA, FeePolicy::Eip1559FixedPriority { priority_wei: 1_000_000 }),
            (FANTOM, FeePolicy::Eip1559DerivedPriority { divisor: 4 }),
            (ARBITRUM_NOVA, FeePolicy::Eip1559ScaledBase { percent: 125 }),
            (BNB_CHAIN, FeePolicy::LegacyFixedRange { min_gwei: 1.2, max_gwei: 1.5 }),
            (MOONBEAM, FeePolicy::LegacyMultiplier { percent: 150 }),
            (MOONRIVER, FeePolicy::LegacyMultiplier { percent: 150 }),
        ]);
        Self { policies }
    }

    /// Built-in table with configured overrides applied on top.
    pub fn from_config(config: &FeeConfig) -> BlockchainResult<Self> {
        let mut table = Self::builtin();
        for (chain, policy) in &config.overrides {
            let chain_id: u64 = chain.parse().map_err(|_| {
                BlockchainError::Build(format!("fee override key '{}' is not a chain id", chain))
            })?;
            policy.validate().map_err(|e| {
                BlockchainError::Build(format!("fee override for chain {}: {}", chain_id, e))
            })?;
            table.insert(chain_id, policy.clone());
        }
        Ok(table)
    }

    pub fn insert(&mut self, chain_id: u64, policy: FeePolicy) {
        self.policies.insert(chain_id, policy);
    }

    pub fn policy_for(&self, chain_id: u64) -> &FeePolicy {
        self.policies.get(&chain_id).unwrap_or(&DEFAULT_POLICY)
    }
}

impl Default for FeeTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Format a wei amount as gwei for logs.
pub fn format_gwei(wei: u128) -> String {
    format!("{:.3}", wei as f64 / GWEI as f64)
}
