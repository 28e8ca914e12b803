//! Memory circuit breakers.
//!
//! # Data Flow
//! ```text
//! Caller estimates bytes for a field/request/aggregation
//!     → memory.rs (atomic add, overhead-scaled limit check, exact rollback)
//!     → parent.rs (optional aggregate check across the hierarchy)
//!     → Ok(used) or Err(CircuitBreaking)
//! ```
//!
//! # Design Decisions
//! - No open/closed state: every call is judged against current usage
//! - Local trips counted per breaker; parent trips counted by the parent
//! - Settings are swapped as immutable snapshots, counters survive reloads

pub mod error;
pub mod memory;
pub mod parent;
pub mod settings;
pub mod stats;

pub use error::{BreakerError, CircuitBreakingError, TripSource};
pub use memory::MemoryBreaker;
pub use parent::ParentLimit;
pub use settings::{BreakerLimits, BreakerSettings};
pub use stats::{BreakerStats, HierarchyStats};
