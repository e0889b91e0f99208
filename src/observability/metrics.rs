//! Metrics collection and exposition.
//!
//! # Metrics
//! - `claimer_wallets_total` (counter): finished wallets by claim mode and outcome
//! - `claimer_rate_limited_total` (counter): HTTP 429 responses by source
//! - `claimer_rpc_errors_total` (counter): failed or timed-out RPC calls by method
//! - `claimer_receipt_polls_total` (counter): receipt lookups by result
//! - `claimer_broadcasts_total` (counter): signed transactions sent
//!
//! Recording is a no-op until a recorder is installed, so library code and
//! tests call these freely.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from inside the tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, address = %addr, "Failed to install metrics exporter"),
    }
}

pub fn record_wallet_outcome(mode: &'static str, outcome: &'static str) {
    metrics::counter!("claimer_wallets_total", "mode" => mode, "outcome" => outcome).increment(1);
}

pub fn record_rate_limited(source: &'static str) {
    metrics::counter!("claimer_rate_limited_total", "source" => source).increment(1);
}

pub fn record_rpc_error(method: &'static str) {
    metrics::counter!("claimer_rpc_errors_total", "method" => method).increment(1);
}

pub fn record_receipt_poll(result: &'static str) {
    metrics::counter!("claimer_receipt_polls_total", "result" => result).increment(1);
}

pub fn record_broadcast() {
    metrics::counter!("claimer_broadcasts_total").increment(1);
}
