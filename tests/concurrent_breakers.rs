//! Concurrency tests for single and child breakers.

use std::sync::Arc;

use memory_breaker::breaker::{BreakerLimits, BreakerSettings, MemoryBreaker};
use memory_breaker::HierarchyBreakerService;

mod common;

const NUM_THREADS: usize = 8;
const BYTES_PER_THREAD: usize = 2_000;
const TOTAL: i64 = (NUM_THREADS * BYTES_PER_THREAD) as i64;

#[test]
fn test_threaded_updates_to_breaker() {
    let breaker = MemoryBreaker::new("request", BreakerLimits::new(TOTAL - 1, 1.0));

    let outcome = common::hammer(&breaker, NUM_THREADS, BYTES_PER_THREAD);

    assert_eq!(outcome.other_errors, 0, "no other errors were returned");
    assert_eq!(outcome.parent_trips, 0);
    assert_eq!(outcome.local_trips, 1, "breaker was tripped exactly once");
    assert_eq!(breaker.tripped_count(), 1, "breaker was tripped exactly once");
    assert_eq!(breaker.used(), TOTAL - 1);
    assert_eq!(outcome.accepted_bytes, breaker.used());
}

#[test]
fn test_threaded_updates_to_child_breaker() {
    let parent = Arc::new(common::NeverTrip);
    let breaker = common::child_breaker(&parent, "request", TOTAL - 1);

    let outcome = common::hammer(&breaker, NUM_THREADS, BYTES_PER_THREAD);

    assert_eq!(outcome.other_errors, 0, "no other errors were returned");
    assert_eq!(outcome.parent_trips, 0);
    assert_eq!(outcome.local_trips, 1, "breaker was tripped exactly once");
    assert_eq!(breaker.tripped_count(), 1, "breaker was tripped exactly once");
    assert_eq!(breaker.used(), TOTAL - 1);
}

#[test]
fn test_threaded_updates_to_child_breaker_with_parent_limit() {
    // parent trips right before the child's own limit would
    let parent = Arc::new(common::ThresholdParent::new(TOTAL - 2));
    let breaker = common::child_breaker(&parent, "request", TOTAL - 1);
    parent.watch(&breaker);

    let outcome = common::hammer(&breaker, NUM_THREADS, BYTES_PER_THREAD);

    assert_eq!(outcome.other_errors, 0, "no other errors were returned");
    assert_eq!(breaker.tripped_count(), 0, "child breaker was never tripped");
    assert_eq!(parent.trips(), 2, "parent breaker was tripped exactly twice");
    assert_eq!(outcome.parent_trips, 2, "total breaker was tripped exactly twice");
    assert_eq!(outcome.local_trips, 0);
    assert_eq!(breaker.used(), TOTAL - 2);
}

#[test]
fn test_accounting_is_conserved_under_contention() {
    let breaker = MemoryBreaker::new("fielddata", BreakerLimits::new(50_000, 1.5));

    let (accepted, rejected) = std::thread::scope(|s| {
        let handles: Vec<_> = (0..NUM_THREADS)
            .map(|t| {
                let breaker = &breaker;
                s.spawn(move || {
                    let mut accepted = 0i64;
                    let mut rejected = 0u64;
                    for i in 0..1_000i64 {
                        let bytes = (i + t as i64) % 17;
                        if i % 5 == 0 {
                            breaker.add_without_breaking(bytes);
                            accepted += bytes;
                        } else {
                            match breaker.add_estimate_bytes_and_maybe_break(bytes, "mixed") {
                                Ok(_) => accepted += bytes,
                                Err(_) => rejected += 1,
                            }
                        }
                    }
                    (accepted, rejected)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .fold((0i64, 0u64), |(a, r), (ta, tr)| (a + ta, r + tr))
    });

    assert_eq!(breaker.used(), accepted);
    assert_eq!(breaker.tripped_count(), rejected);
    assert!(rejected > 0, "load is large enough to trip the breaker");
}

#[test]
fn test_hierarchy_parent_limit_under_contention() {
    let service = HierarchyBreakerService::new(
        TOTAL / 2,
        vec![
            BreakerSettings::new("fielddata", TOTAL, 1.0),
            BreakerSettings::new("request", TOTAL, 1.0),
        ],
    )
    .unwrap();
    let fielddata = service.breaker("fielddata").unwrap();
    let request = service.breaker("request").unwrap();

    let (a, b) = std::thread::scope(|s| {
        let a = s.spawn(|| common::hammer(&fielddata, NUM_THREADS / 2, BYTES_PER_THREAD));
        let b = s.spawn(|| common::hammer(&request, NUM_THREADS / 2, BYTES_PER_THREAD));
        (a.join().unwrap(), b.join().unwrap())
    });

    assert_eq!(a.local_trips + b.local_trips, 0);
    assert_eq!(a.other_errors + b.other_errors, 0);
    assert_eq!(fielddata.tripped_count() + request.tripped_count(), 0);
    assert_eq!(
        a.parent_trips + b.parent_trips,
        service.parent_tripped_count()
    );
    assert_eq!(fielddata.used(), a.accepted_bytes);
    assert_eq!(request.used(), b.accepted_bytes);
    assert!(service.parent_tripped_count() > 0, "twice the parent limit was attempted");
}
