//! Periodic breaker statistics reporting.
//!
//! # Responsibilities
//! - Publish per-breaker usage and limit gauges
//! - Log a usage summary at debug level

use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time;

use super::HierarchyBreakerService;
use crate::observability::metrics;

pub struct StatsReporter {
    service: HierarchyBreakerService,
    interval: Duration,
}

impl StatsReporter {
    pub fn new(service: HierarchyBreakerService, interval: Duration) -> Self {
        Self { service, interval }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Stats reporter starting");

        let mut ticker = time::interval(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.report();
                }
                _ = shutdown.recv() => {
                    tracing::info!("Stats reporter received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Publish one round of gauges.
    pub fn report(&self) {
        let stats = self.service.stats();
        for breaker in stats.breakers.iter().chain(std::iter::once(&stats.parent)) {
            metrics::record_breaker_stats(breaker);
            tracing::debug!(
                breaker = %breaker.name,
                used = %breaker.estimated_size,
                limit = %breaker.limit_size,
                tripped = breaker.tripped,
                "Breaker usage"
            );
        }
    }
}
