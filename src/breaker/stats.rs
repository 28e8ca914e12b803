//! Point-in-time breaker statistics.

use serde::{Deserialize, Serialize};

use crate::config::byte_size::ByteSize;

/// Statistics for one breaker, in the shape node stats APIs report them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakerStats {
    pub name: String,
    pub limit_size_in_bytes: i64,
    pub limit_size: String,
    pub estimated_size_in_bytes: i64,
    pub estimated_size: String,
    pub overhead: f64,
    pub tripped: u64,
}

impl BreakerStats {
    pub fn new(
        name: impl Into<String>,
        limit: i64,
        estimated: i64,
        overhead: f64,
        tripped: u64,
    ) -> Self {
        Self {
            name: name.into(),
            limit_size_in_bytes: limit,
            limit_size: ByteSize(limit).to_string(),
            estimated_size_in_bytes: estimated,
            estimated_size: ByteSize(estimated).to_string(),
            overhead,
            tripped,
        }
    }
}

/// Statistics for a whole hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyStats {
    pub parent: BreakerStats,
    pub breakers: Vec<BreakerStats>,
}
