//! Breaker settings snapshots.

use serde::{Deserialize, Serialize};

/// Limit and overhead applied by a breaker at check time.
///
/// Snapshots are immutable; a settings change replaces the whole snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakerLimits {
    /// Ceiling in bytes. Negative means unlimited.
    pub limit_bytes: i64,
    /// Multiplier applied to `used` before comparing against the limit.
    pub overhead: f64,
}

impl BreakerLimits {
    pub fn new(limit_bytes: i64, overhead: f64) -> Self {
        Self {
            limit_bytes,
            overhead,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(-1, 1.0)
    }

    pub fn is_unlimited(&self) -> bool {
        self.limit_bytes < 0
    }

    /// Whether `used` bytes, scaled by the overhead, exceed the limit.
    pub fn exceeded_by(&self, used: i64) -> bool {
        !self.is_unlimited() && used as f64 * self.overhead > self.limit_bytes as f64
    }
}

/// Construction settings for a named breaker.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakerSettings {
    pub name: String,
    pub limits: BreakerLimits,
}

impl BreakerSettings {
    pub fn new(name: impl Into<String>, limit_bytes: i64, overhead: f64) -> Self {
        Self {
            name: name.into(),
            limits: BreakerLimits::new(limit_bytes, overhead),
        }
    }
}
