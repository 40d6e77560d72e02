//! A single named timing counter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Accumulates invocation count and elapsed time for one monitor name.
///
/// All fields are updated with relaxed atomics: accumulation is
/// commutative, so no cross-thread ordering is required, but every
/// completed sample lands exactly once. Counters are created on first
/// reference and live until process exit.
#[derive(Debug)]
pub struct TimingCounter {
    name: String,
    invocations: AtomicU64,
    total_nanos: AtomicU64,
    max_nanos: AtomicU64,
    last_nanos: AtomicU64,
}

impl TimingCounter {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            invocations: AtomicU64::new(0),
            total_nanos: AtomicU64::new(0),
            max_nanos: AtomicU64::new(0),
            last_nanos: AtomicU64::new(0),
        }
    }

    /// The registry name of this counter.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record one sample: adds the elapsed time and increments the
    /// invocation count.
    pub fn record(&self, elapsed: Duration) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.invocations.fetch_add(1, Ordering::Relaxed);
        self.total_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.max_nanos.fetch_max(nanos, Ordering::Relaxed);
        self.last_nanos.store(nanos, Ordering::Relaxed);
    }

    /// Number of recorded invocations.
    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::Relaxed)
    }

    /// Cumulative elapsed nanoseconds across all recorded invocations.
    pub fn total_nanos(&self) -> u64 {
        self.total_nanos.load(Ordering::Relaxed)
    }

    /// Largest single sample in nanoseconds.
    pub fn max_nanos(&self) -> u64 {
        self.max_nanos.load(Ordering::Relaxed)
    }

    /// Most recently recorded sample in nanoseconds.
    pub fn last_nanos(&self) -> u64 {
        self.last_nanos.load(Ordering::Relaxed)
    }

    /// Zero every accumulator. Intended for test isolation; production
    /// counters are monotone for the process lifetime.
    pub fn reset(&self) {
        self.invocations.store(0, Ordering::Relaxed);
        self.total_nanos.store(0, Ordering::Relaxed);
        self.max_nanos.store(0, Ordering::Relaxed);
        self.last_nanos.store(0, Ordering::Relaxed);
    }

    /// A consistent-enough point-in-time read view.
    ///
    /// Individual fields are read independently; under concurrent
    /// recording the snapshot may straddle a sample, which is
    /// acceptable for monitoring output.
    pub fn snapshot(&self) -> CounterSnapshot {
        let invocations = self.invocations();
        let total_nanos = self.total_nanos();
        CounterSnapshot {
            name: self.name.clone(),
            invocations,
            total_nanos,
            max_nanos: self.max_nanos(),
            last_nanos: self.last_nanos(),
            mean_nanos: if invocations == 0 {
                0
            } else {
                total_nanos / invocations
            },
        }
    }
}

/// Serializable read view of a [`TimingCounter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    /// Counter name.
    pub name: String,
    /// Number of recorded invocations.
    pub invocations: u64,
    /// Cumulative elapsed nanoseconds.
    pub total_nanos: u64,
    /// Largest single sample.
    pub max_nanos: u64,
    /// Most recent sample.
    pub last_nanos: u64,
    /// Mean sample, zero when nothing was recorded.
    pub mean_nanos: u64,
}
