//! Metrics collection and exposition.
//!
//! # Metrics
//! - `site_data_fetch_total` (counter): fetches by resource and answering tier
//! - `site_data_cache_invalidations_total` (counter): entries purged on version change
//! - `site_data_background_refresh_total` (counter): refresh outcomes

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exporter on `addr`. Must run inside a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record which tier answered a fetch (`master`, `cache`, `primary`, `secondary`, `none`).
pub fn record_fetch(resource: &'static str, source: &'static str) {
    metrics::counter!("site_data_fetch_total", "resource" => resource, "source" => source)
        .increment(1);
}

pub fn record_cache_invalidation(removed: usize) {
    metrics::counter!("site_data_cache_invalidations_total").increment(removed as u64);
}

pub fn record_background_refresh(outcome: &'static str) {
    metrics::counter!("site_data_background_refresh_total", "outcome" => outcome).increment(1);
}
