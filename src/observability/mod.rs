//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Breakers and the hierarchy service produce:
//!     → logging.rs (structured log events: trips, reloads, registration)
//!     → metrics.rs (trip counters, usage and limit gauges)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Trips log at warn, accounting at trace
//! - Metrics are cheap (atomic increments) and safe without a recorder

pub mod logging;
pub mod metrics;
