//! Hierarchical memory circuit breakers.
//!
//! Callers estimate the memory an operation is about to use and account it
//! against a named [`MemoryBreaker`]. A breaker rejects the estimate when its
//! own overhead-scaled limit would be exceeded, or when the
//! [`HierarchyBreakerService`] it belongs to reports that all breakers
//! together exceed the parent limit.

pub mod admin;
pub mod breaker;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod service;

pub use breaker::{BreakerError, CircuitBreakingError, MemoryBreaker, ParentLimit};
pub use config::schema::NodeConfig;
pub use lifecycle::Shutdown;
pub use service::HierarchyBreakerService;
