//! Sequential run over all wallets.
//!
//! Each wallet is claimed in turn. Wallet-scoped errors are logged with the
//! address and appended to the failure log; they never stop the run. Between
//! wallets the runner sleeps a random delay, which Ctrl-C cuts short.

use alloy::primitives::Address;
use rand::seq::SliceRandom;
use std::fmt;
use std::sync::Arc;
use tokio::time::sleep;

use crate::blockchain::Wallet;
use crate::claim::failure_log::FailureLog;
use crate::claim::strategy::ClaimStrategy;
use crate::claim::types::ClaimOutcome;
use crate::config::ScheduleConfig;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::resilience::random_delay;

/// Tally of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub claimed: usize,
    pub nothing_to_claim: usize,
    pub failed: usize,
    /// Wallets left unprocessed because the run was interrupted.
    pub aborted: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.claimed + self.nothing_to_claim + self.failed + self.aborted
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} claimed, {} nothing to claim, {} failed, {} not processed",
            self.claimed, self.nothing_to_claim, self.failed, self.aborted
        )
    }
}

pub struct ClaimRunner {
    strategy: Arc<dyn ClaimStrategy>,
    failure_log: FailureLog,
    schedule: ScheduleConfig,
    shutdown: Shutdown,
}

impl ClaimRunner {
    pub fn new(
        strategy: Arc<dyn ClaimStrategy>,
        failure_log: FailureLog,
        schedule: ScheduleConfig,
        shutdown: Shutdown,
    ) -> Self {
        Self {
            strategy,
            failure_log,
            schedule,
            shutdown,
        }
    }

    pub async fn run(&self, mut wallets: Vec<Wallet>) -> RunSummary {
        if self.schedule.shuffle {
            wallets.shuffle(&mut rand::thread_rng());
        }

        let total = wallets.len();
        let mut summary = RunSummary::default();
        tracing::info!(wallets = total, strategy = self.strategy.name(), "Starting claim run");

        for (i, wallet) in wallets.iter().enumerate() {
            if self.shutdown.is_triggered() {
                summary.aborted = total - i;
                tracing::warn!(remaining = summary.aborted, "Run interrupted");
                break;
            }

            tracing::info!(address = %wallet.address(), "Wallet {}/{}", i + 1, total);
            match self.process(wallet).await {
                ClaimOutcome::Claimed(_) => summary.claimed += 1,
                ClaimOutcome::NothingToClaim => summary.nothing_to_claim += 1,
                ClaimOutcome::Failed { .. } => summary.failed += 1,
            }

            if i + 1 < total {
                self.pause_between_wallets().await;
            }
        }

        tracing::info!(%summary, "Claim run finished");
        summary
    }

    /// Claim for one wallet, folding errors into a `Failed` outcome.
    async fn process(&self, wallet: &Wallet) -> ClaimOutcome {
        let address = wallet.address();
        let outcome = match self.strategy.claim(wallet).await {
            Ok(outcome) => outcome,
            Err(e) => ClaimOutcome::Failed {
                reason: e.to_string(),
            },
        };

        metrics::record_wallet_outcome(self.strategy.name(), outcome.label());
        match &outcome {
            ClaimOutcome::Claimed(detail) => {
                tracing::info!(address = %address, ?detail, "Claim succeeded");
            }
            ClaimOutcome::NothingToClaim => {}
            ClaimOutcome::Failed { reason } => {
                tracing::error!(address = %address, reason = %reason, "Claim failed");
                self.record_failure(address);
            }
        }
        outcome
    }

    fn record_failure(&self, address: Address) {
        if let Err(e) = self.failure_log.record(address) {
            tracing::error!(
                address = %address,
                path = %self.failure_log.path().display(),
                error = %e,
                "Could not append to failure log"
            );
        }
    }

    async fn pause_between_wallets(&self) {
        let delay = random_delay(
            self.schedule.sleep_min_secs,
            self.schedule.sleep_max_secs,
            &mut rand::thread_rng(),
        );
        tracing::info!("Sleeping {} seconds before the next wallet", delay.as_secs());

        tokio::select! {
            _ = sleep(delay) => {}
            _ = self.shutdown.wait() => {
                tracing::info!("Sleep interrupted");
            }
        }
    }
}
