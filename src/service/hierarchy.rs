//! Hierarchy of child breakers under one parent limit.

use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use crate::breaker::{
    BreakerError, BreakerLimits, BreakerSettings, BreakerStats, CircuitBreakingError,
    HierarchyStats, MemoryBreaker, ParentLimit, TripSource,
};
use crate::config::schema::BreakerConfig;
use crate::observability::metrics;

/// Name reported for the aggregate breaker.
pub const PARENT_BREAKER_NAME: &str = "parent";

struct Inner {
    breakers: HashMap<String, Arc<MemoryBreaker>>,
    parent_limit: ArcSwap<BreakerLimits>,
    parent_tripped: AtomicU64,
}

impl Inner {
    /// Sum of `used * overhead` over all children, read without a lock.
    fn total_estimated(&self) -> f64 {
        self.breakers
            .values()
            .map(|b| b.used() as f64 * b.overhead())
            .sum()
    }
}

impl ParentLimit for Inner {
    fn check_parent_limit(&self, label: &str) -> Result<(), CircuitBreakingError> {
        let limits = self.parent_limit.load();
        if limits.is_unlimited() {
            return Ok(());
        }

        let total = self.total_estimated();
        if total > limits.limit_bytes as f64 {
            self.parent_tripped.fetch_add(1, Ordering::AcqRel);
            let err = CircuitBreakingError::new(
                label,
                0,
                limits.limit_bytes,
                total as i64,
                TripSource::Parent,
            );
            tracing::warn!(
                label,
                total = total as i64,
                limit = limits.limit_bytes,
                "Parent breaker tripped"
            );
            metrics::record_trip(PARENT_BREAKER_NAME, &err.origin);
            return Err(err);
        }
        Ok(())
    }
}

/// Owns the named breakers of a node and enforces the aggregate limit.
///
/// Cheap to clone; clones share the same breakers.
#[derive(Clone)]
pub struct HierarchyBreakerService {
    inner: Arc<Inner>,
}

impl HierarchyBreakerService {
    /// Build the hierarchy. Names must be unique.
    pub fn new(parent_limit: i64, children: Vec<BreakerSettings>) -> Result<Self, BreakerError> {
        let mut seen = std::collections::HashSet::new();
        for settings in &children {
            if !seen.insert(settings.name.as_str()) {
                return Err(BreakerError::DuplicateBreaker {
                    name: settings.name.clone(),
                });
            }
        }

        let inner = Arc::new_cyclic(|weak: &Weak<Inner>| {
            let breakers = children
                .into_iter()
                .map(|settings| {
                    let parent: Weak<dyn ParentLimit> = weak.clone();
                    let name = settings.name.clone();
                    (name, Arc::new(MemoryBreaker::child(settings, parent)))
                })
                .collect();

            Inner {
                breakers,
                parent_limit: ArcSwap::from_pointee(BreakerLimits::new(parent_limit, 1.0)),
                parent_tripped: AtomicU64::new(0),
            }
        });

        for breaker in inner.breakers.values() {
            tracing::info!(
                breaker = breaker.name(),
                limit = breaker.limit(),
                overhead = breaker.overhead(),
                "Registered breaker"
            );
        }
        tracing::info!(limit = parent_limit, "Parent breaker configured");

        Ok(Self { inner })
    }

    pub fn from_config(config: &BreakerConfig) -> Result<Self, BreakerError> {
        let children = config.children.iter().map(BreakerSettings::from).collect();
        Self::new(config.parent.limit.bytes(), children)
    }

    /// Look up a breaker by name.
    pub fn breaker(&self, name: &str) -> Result<Arc<MemoryBreaker>, BreakerError> {
        self.inner
            .breakers
            .get(name)
            .cloned()
            .ok_or_else(|| BreakerError::NotFound {
                name: name.to_string(),
            })
    }

    /// Registered breaker names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.breakers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Fail if the aggregate usage of all breakers exceeds the parent limit.
    ///
    /// Sibling usage is read live without a lock and may be stale by
    /// in-flight additions.
    pub fn check_parent_limit(&self, label: &str) -> Result<(), BreakerError> {
        self.inner.check_parent_limit(label).map_err(BreakerError::from)
    }

    pub fn parent_limit(&self) -> i64 {
        self.inner.parent_limit.load().limit_bytes
    }

    pub fn parent_tripped_count(&self) -> u64 {
        self.inner.parent_tripped.load(Ordering::Acquire)
    }

    /// Apply reloaded settings. Counters of existing breakers are kept.
    ///
    /// Breakers cannot be added at runtime; unknown names are ignored and
    /// registered breakers left out of `config` keep their limits.
    pub fn apply_config(&self, config: &BreakerConfig) {
        for child in &config.children {
            match self.inner.breakers.get(&child.name) {
                Some(breaker) => breaker.update_limits(BreakerSettings::from(child).limits),
                None => tracing::warn!(
                    breaker = %child.name,
                    "Ignoring settings for unregistered breaker"
                ),
            }
        }

        for name in self.missing_from(config) {
            tracing::warn!(
                breaker = %name,
                "Breaker missing from reloaded settings, keeping current limits"
            );
        }

        let new_parent = BreakerLimits::new(config.parent.limit.bytes(), 1.0);
        let previous = self.inner.parent_limit.swap(Arc::new(new_parent));
        if previous.limit_bytes != new_parent.limit_bytes {
            tracing::info!(
                old_limit = previous.limit_bytes,
                new_limit = new_parent.limit_bytes,
                "Updated parent breaker limit"
            );
        }
    }

    /// Registered names that `config` does not mention, sorted.
    fn missing_from(&self, config: &BreakerConfig) -> Vec<&str> {
        let mut missing: Vec<&str> = self
            .inner
            .breakers
            .keys()
            .map(String::as_str)
            .filter(|name| !config.children.iter().any(|c| c.name == *name))
            .collect();
        missing.sort_unstable();
        missing
    }

    /// Stats for the parent alone.
    pub fn parent_stats(&self) -> BreakerStats {
        BreakerStats::new(
            PARENT_BREAKER_NAME,
            self.parent_limit(),
            self.inner.total_estimated() as i64,
            1.0,
            self.parent_tripped_count(),
        )
    }

    pub fn stats(&self) -> HierarchyStats {
        let mut breakers: Vec<BreakerStats> =
            self.inner.breakers.values().map(|b| b.stats()).collect();
        breakers.sort_by(|a, b| a.name.cmp(&b.name));

        HierarchyStats {
            parent: self.parent_stats(),
            breakers,
        }
    }
}

impl std::fmt::Debug for HierarchyBreakerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HierarchyBreakerService")
            .field("breakers", &self.names())
            .field("parent_limit", &self.parent_limit())
            .finish()
    }
}
