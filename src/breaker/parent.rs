//! Parent limit capability held by child breakers.

use super::error::CircuitBreakingError;

/// Answers whether the aggregate usage above a breaker is still within bounds.
///
/// Called by a child breaker after its own check passed and its addition was
/// committed. Implementations must not touch the child's counters; the child
/// rolls back its own addition when this fails.
pub trait ParentLimit: Send + Sync {
    fn check_parent_limit(&self, label: &str) -> Result<(), CircuitBreakingError>;
}
