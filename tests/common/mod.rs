//! Shared utilities for breaker integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use memory_breaker::breaker::{
    BreakerError, BreakerSettings, CircuitBreakingError, MemoryBreaker, ParentLimit, TripSource,
};

/// Parent that never rejects.
pub struct NeverTrip;

impl ParentLimit for NeverTrip {
    fn check_parent_limit(&self, _label: &str) -> Result<(), CircuitBreakingError> {
        Ok(())
    }
}

/// Parent that rejects whenever the watched breaker's usage exceeds `threshold`.
pub struct ThresholdParent {
    breaker: OnceLock<Weak<MemoryBreaker>>,
    threshold: i64,
    trips: AtomicU64,
}

impl ThresholdParent {
    pub fn new(threshold: i64) -> Self {
        Self {
            breaker: OnceLock::new(),
            threshold,
            trips: AtomicU64::new(0),
        }
    }

    pub fn watch(&self, breaker: &Arc<MemoryBreaker>) {
        let _ = self.breaker.set(Arc::downgrade(breaker));
    }

    pub fn trips(&self) -> u64 {
        self.trips.load(Ordering::SeqCst)
    }
}

impl ParentLimit for ThresholdParent {
    fn check_parent_limit(&self, label: &str) -> Result<(), CircuitBreakingError> {
        let used = self
            .breaker
            .get()
            .and_then(Weak::upgrade)
            .map(|b| b.used())
            .unwrap_or(0);
        if used > self.threshold {
            self.trips.fetch_add(1, Ordering::SeqCst);
            return Err(CircuitBreakingError::new(
                label,
                0,
                self.threshold,
                used,
                TripSource::Parent,
            ));
        }
        Ok(())
    }
}

/// Build a child breaker wired to `parent`.
pub fn child_breaker<P: ParentLimit + 'static>(
    parent: &Arc<P>,
    name: &str,
    limit: i64,
) -> Arc<MemoryBreaker> {
    let weak: Weak<dyn ParentLimit> = Arc::downgrade(parent) as Weak<dyn ParentLimit>;
    Arc::new(MemoryBreaker::child(BreakerSettings::new(name, limit, 1.0), weak))
}

/// Outcome of hammering a breaker from several threads.
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub local_trips: u64,
    pub parent_trips: u64,
    pub other_errors: u64,
    pub accepted_bytes: i64,
}

/// Run `threads` threads, each adding `per_thread` single bytes.
pub fn hammer(breaker: &MemoryBreaker, threads: usize, per_thread: usize) -> RunOutcome {
    let local = AtomicU64::new(0);
    let parent = AtomicU64::new(0);
    let other = AtomicU64::new(0);
    let accepted = AtomicU64::new(0);

    std::thread::scope(|s| {
        for _ in 0..threads {
            s.spawn(|| {
                for _ in 0..per_thread {
                    match breaker.add_estimate_bytes_and_maybe_break(1, "test") {
                        Ok(_) => {
                            accepted.fetch_add(1, Ordering::SeqCst);
                        }
                        Err(BreakerError::CircuitBreaking(e)) if e.is_parent() => {
                            parent.fetch_add(1, Ordering::SeqCst);
                        }
                        Err(BreakerError::CircuitBreaking(_)) => {
                            local.fetch_add(1, Ordering::SeqCst);
                        }
                        Err(_) => {
                            other.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                }
            });
        }
    });

    RunOutcome {
        local_trips: local.into_inner(),
        parent_trips: parent.into_inner(),
        other_errors: other.into_inner(),
        accepted_bytes: accepted.into_inner() as i64,
    }
}
