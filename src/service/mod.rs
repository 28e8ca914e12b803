//! Breaker hierarchy service.
//!
//! # Data Flow
//! ```text
//! BreakerConfig (startup)
//!     → hierarchy.rs (register child breakers, wire parent check)
//!     → lookups by name from callers
//!
//! Child breaker passes its own limit:
//!     → hierarchy.rs check_parent_limit (sum of used * overhead)
//!     → reject with [parent] trip, child rolls back
//!
//! Background:
//!     reporter.rs → breaker gauges + debug summary
//! ```
//!
//! # Design Decisions
//! - No cached total; the aggregate is summed on every parent check
//! - No lock across siblings; the aggregate may lag in-flight additions
//! - Children hold the parent weakly, the service owns the children

pub mod hierarchy;
pub mod reporter;

pub use hierarchy::{HierarchyBreakerService, PARENT_BREAKER_NAME};
pub use reporter::StatsReporter;
