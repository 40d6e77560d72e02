//! Concurrency stress tests: no lost counter updates under parallel
//! invocation.

#[path = "../common/mod.rs"]
mod common;

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use common::{create_binder, init_tracing, widget_binding, TimeoutError};
use spanwatch::{CounterRegistry, ErrorMatch, ExceptionFilter, MonitorDecl, Strategy};

#[test]
fn test_concurrent_invocations_count_exactly_once_each() {
    init_tracing();
    let (counters, _, binder) = create_binder();
    let bound = Arc::new(
        binder
            .bind(&widget_binding(MonitorDecl::named("stress.monitor")))
            .unwrap(),
    );

    let num_threads = 128;
    let barrier = Arc::new(Barrier::new(num_threads));
    let handles: Vec<_> = (0..num_threads)
        .map(|_| {
            let bound = bound.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                let result: Result<(), TimeoutError> = bound.advice.invoke(|| Ok(()));
                result.is_ok()
            })
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap_or(false))
        .filter(|&ok| ok)
        .count();

    assert_eq!(successes, num_threads);
    let counter = counters.get("stress.monitor").unwrap();
    assert_eq!(counter.invocations(), num_threads as u64);
}

#[test]
fn test_concurrent_mixed_outcomes_split_exactly() {
    init_tracing();
    let (counters, _, binder) = create_binder();
    let decl = MonitorDecl::named("mixed.monitor").with_filter(
        ExceptionFilter::new(Strategy::Segregate)
            .on(ErrorMatch::of::<TimeoutError>())
            .with_child("timeouts"),
    );
    let bound = Arc::new(binder.bind(&widget_binding(decl)).unwrap());

    let num_threads = 100;
    let barrier = Arc::new(Barrier::new(num_threads));
    let handles: Vec<_> = (0..num_threads)
        .map(|i| {
            let bound = bound.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                if i % 2 == 0 {
                    let _: Result<(), TimeoutError> = bound.advice.invoke(|| Ok(()));
                } else {
                    let _: Result<(), TimeoutError> = bound.advice.invoke(|| Err(TimeoutError));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(counters.get("mixed.monitor").unwrap().invocations(), 50);
    assert_eq!(
        counters.get("mixed.monitor.timeouts").unwrap().invocations(),
        50
    );
}

#[test]
fn test_concurrent_lazy_creation_yields_one_counter() {
    init_tracing();
    let registry = Arc::new(CounterRegistry::new());

    let num_threads = 64;
    let barrier = Arc::new(Barrier::new(num_threads));
    let handles: Vec<_> = (0..num_threads)
        .map(|_| {
            let registry = registry.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                let counter = registry.get_or_create("raced.counter");
                counter.record(Duration::from_nanos(1));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.len(), 1);
    let counter = registry.get("raced.counter").unwrap();
    assert_eq!(counter.invocations(), num_threads as u64);
    assert_eq!(counter.total_nanos(), num_threads as u64);
}

#[test]
fn test_total_elapsed_reflects_every_sample() {
    init_tracing();
    let (counters, _, binder) = create_binder();
    let bound = Arc::new(
        binder
            .bind(&widget_binding(MonitorDecl::named("elapsed.monitor")))
            .unwrap(),
    );

    let num_threads = 16;
    let handles: Vec<_> = (0..num_threads)
        .map(|_| {
            let bound = bound.clone();
            thread::spawn(move || {
                let _: Result<(), TimeoutError> = bound.advice.invoke(|| {
                    thread::sleep(Duration::from_millis(2));
                    Ok(())
                });
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let counter = counters.get("elapsed.monitor").unwrap();
    assert_eq!(counter.invocations(), num_threads as u64);
    // Every sample slept at least 2ms.
    assert!(counter.total_nanos() >= num_threads as u64 * 2_000_000);
    assert!(counter.max_nanos() >= 2_000_000);
}
