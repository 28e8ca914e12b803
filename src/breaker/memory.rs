//! Memory accounting breaker.
//!
//! # Algorithm
//! ```text
//! add_estimate_bytes_and_maybe_break(bytes):
//!     new_used = used + bytes                        (optimistic commit)
//!         overflows i64? → tripped += 1, reject (local, nothing committed)
//!     new_used * overhead > limit?
//!         yes → used.fetch_sub(bytes), tripped += 1, reject (local)
//!     parent.check_parent_limit()?
//!         fail → used.fetch_sub(bytes), reject (parent, tripped untouched)
//!     → new_used
//! ```
//!
//! Adding before checking keeps the transient overshoot bounded by the
//! in-flight additions and makes every rollback an exact subtraction.

use arc_swap::ArcSwap;
use std::fmt;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use super::error::{BreakerError, CircuitBreakingError, TripSource};
use super::parent::ParentLimit;
use super::settings::{BreakerLimits, BreakerSettings};
use super::stats::BreakerStats;
use crate::observability::metrics;

/// A named memory counter gated by a byte limit.
pub struct MemoryBreaker {
    name: String,
    limits: ArcSwap<BreakerLimits>,
    used: AtomicI64,
    tripped: AtomicU64,
    parent: Option<Weak<dyn ParentLimit>>,
}

impl MemoryBreaker {
    /// Create a standalone breaker with no parent.
    pub fn new(name: impl Into<String>, limits: BreakerLimits) -> Self {
        Self {
            name: name.into(),
            limits: ArcSwap::from_pointee(limits),
            used: AtomicI64::new(0),
            tripped: AtomicU64::new(0),
            parent: None,
        }
    }

    /// Create a breaker that consults `parent` after each successful local check.
    ///
    /// The parent is held weakly; once it is dropped the parent check is skipped.
    pub fn child(settings: BreakerSettings, parent: Weak<dyn ParentLimit>) -> Self {
        Self {
            name: settings.name,
            limits: ArcSwap::from_pointee(settings.limits),
            used: AtomicI64::new(0),
            tripped: AtomicU64::new(0),
            parent: Some(parent),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Account `bytes` and reject if the limit (or the parent's) would be exceeded.
    ///
    /// Returns the committed usage on success. On rejection nothing stays
    /// accounted for this call.
    pub fn add_estimate_bytes_and_maybe_break(
        &self,
        bytes: i64,
        label: &str,
    ) -> Result<i64, BreakerError> {
        if bytes < 0 {
            return Err(BreakerError::NegativeEstimate {
                label: label.to_string(),
                bytes,
            });
        }

        let limits = self.limits.load();
        // A sum past i64::MAX is never stored; it counts as a local trip.
        let previous = match self
            .used
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| used.checked_add(bytes))
        {
            Ok(previous) => previous,
            Err(current) => return Err(self.trip_local(label, bytes, &limits, current)),
        };
        let new_used = previous + bytes;

        if limits.exceeded_by(new_used) {
            self.used.fetch_sub(bytes, Ordering::AcqRel);
            return Err(self.trip_local(label, bytes, &limits, previous));
        }

        if let Some(parent) = self.parent.as_ref().and_then(Weak::upgrade) {
            if let Err(mut err) = parent.check_parent_limit(label) {
                self.used.fetch_sub(bytes, Ordering::AcqRel);
                err.bytes_requested = bytes;
                tracing::debug!(
                    breaker = %self.name,
                    label,
                    bytes,
                    "Parent limit rejected addition, rolled back"
                );
                return Err(err.into());
            }
        }

        tracing::trace!(
            breaker = %self.name,
            label,
            bytes,
            used = new_used,
            limit = limits.limit_bytes,
            "Added estimate"
        );
        Ok(new_used)
    }

    fn trip_local(
        &self,
        label: &str,
        bytes: i64,
        limits: &BreakerLimits,
        used: i64,
    ) -> BreakerError {
        self.tripped.fetch_add(1, Ordering::AcqRel);

        let err = CircuitBreakingError::new(
            label,
            bytes,
            limits.limit_bytes,
            used,
            TripSource::Local(self.name.clone()),
        );
        tracing::warn!(
            breaker = %self.name,
            label,
            bytes,
            limit = limits.limit_bytes,
            overhead = limits.overhead,
            used,
            "Breaker tripped"
        );
        metrics::record_trip(&self.name, &err.origin);
        err.into()
    }

    /// Account `bytes` with no limit check.
    ///
    /// For memory that is already allocated. Negative values release memory
    /// previously accounted. Usage saturates at `i64::MAX` instead of wrapping.
    pub fn add_without_breaking(&self, bytes: i64) -> i64 {
        let saturate = |used: i64| used.saturating_add(bytes);
        let new_used = match self
            .used
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| Some(saturate(used)))
        {
            Ok(previous) | Err(previous) => saturate(previous),
        };
        debug_assert!(new_used >= 0, "used bytes [{}] must be >= 0", new_used);
        tracing::trace!(breaker = %self.name, bytes, used = new_used, "Adjusted usage");
        new_used
    }

    pub fn used(&self) -> i64 {
        self.used.load(Ordering::Acquire)
    }

    pub fn limit(&self) -> i64 {
        self.limits.load().limit_bytes
    }

    pub fn overhead(&self) -> f64 {
        self.limits.load().overhead
    }

    /// Number of local trips. Parent rejections are not counted here.
    pub fn tripped_count(&self) -> u64 {
        self.tripped.load(Ordering::Acquire)
    }

    /// Current settings snapshot.
    pub fn limits(&self) -> BreakerLimits {
        **self.limits.load()
    }

    /// Replace limit and overhead. Usage and trip count are kept.
    ///
    /// Checks already in flight may still use the previous snapshot.
    pub fn update_limits(&self, limits: BreakerLimits) {
        let previous = self.limits.swap(Arc::new(limits));
        if *previous != limits {
            tracing::info!(
                breaker = %self.name,
                old_limit = previous.limit_bytes,
                new_limit = limits.limit_bytes,
                old_overhead = previous.overhead,
                new_overhead = limits.overhead,
                "Updated breaker settings"
            );
        }
    }

    pub fn stats(&self) -> BreakerStats {
        let limits = self.limits();
        BreakerStats::new(
            self.name.clone(),
            limits.limit_bytes,
            self.used(),
            limits.overhead,
            self.tripped_count(),
        )
    }
}

impl fmt::Debug for MemoryBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBreaker")
            .field("name", &self.name)
            .field("limits", &self.limits())
            .field("used", &self.used())
            .field("tripped", &self.tripped_count())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
