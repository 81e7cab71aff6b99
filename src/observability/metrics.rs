//! Metrics collection and exposition.
//!
//! # Metrics
//! - `staker_paths_scanned_total` (counter): paths visited, by outcome
//! - `staker_accounts_added_total` (counter): registry entries added by scans
//! - `staker_discovery_fallback_total` (counter): index lookups that failed
//! - `staker_reconcile_failures_total` (counter): accounts whose read failed
//! - `staker_rpc_errors_total` (counter): failed RPC attempts, by method
//! - `staker_transactions_total` (counter): signed calls, by method and outcome

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint. Must run inside the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_path_scanned(outcome: &'static str) {
    metrics::counter!("staker_paths_scanned_total", "outcome" => outcome).increment(1);
}

pub fn record_accounts_added(count: usize) {
    metrics::counter!("staker_accounts_added_total").increment(count as u64);
}

pub fn record_discovery_fallback() {
    metrics::counter!("staker_discovery_fallback_total").increment(1);
}

pub fn record_reconcile_failure() {
    metrics::counter!("staker_reconcile_failures_total").increment(1);
}

pub fn record_rpc_error(method: &'static str) {
    metrics::counter!("staker_rpc_errors_total", "method" => method).increment(1);
}

pub fn record_transaction(method: &str, outcome: &str) {
    metrics::counter!(
        "staker_transactions_total",
        "method" => method.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}
