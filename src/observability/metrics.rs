//! Metrics collection and exposition.
//!
//! # Metrics
//! - `breaker_trips_total` (counter): trips by breaker and source (local, parent)
//! - `breaker_used_bytes` (gauge): current estimated usage per breaker
//! - `breaker_limit_bytes` (gauge): configured limit per breaker
//!
//! Updates are no-ops until a recorder is installed with [`init_metrics`].

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

use crate::breaker::{BreakerStats, TripSource};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_trip(breaker: &str, source: &TripSource) {
    ::metrics::counter!(
        "breaker_trips_total",
        "breaker" => breaker.to_string(),
        "source" => source.as_label()
    )
    .increment(1);
}

pub fn record_breaker_stats(stats: &BreakerStats) {
    ::metrics::gauge!("breaker_used_bytes", "breaker" => stats.name.clone())
        .set(stats.estimated_size_in_bytes as f64);
    ::metrics::gauge!("breaker_limit_bytes", "breaker" => stats.name.clone())
        .set(stats.limit_size_in_bytes as f64);
}
