//! Process-wide counter registry with lazy creation.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use tracing::debug;

use super::{CounterSnapshot, TimingCounter};

static GLOBAL: LazyLock<CounterRegistry> = LazyLock::new(CounterRegistry::new);

/// Thread-safe store mapping counter names to [`TimingCounter`]s.
///
/// Counters are created lazily on first reference and never removed.
/// Lookups take a read lock only; the write lock is held briefly for
/// first creation and never across a monitored call.
pub struct CounterRegistry {
    counters: RwLock<HashMap<String, Arc<TimingCounter>>>,
}

impl CounterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide registry shared by all monitors that do not
    /// carry their own.
    pub fn global() -> &'static CounterRegistry {
        &GLOBAL
    }

    /// Get the counter for `name`, creating it on first reference.
    ///
    /// Two threads racing on the same unseen name observe the same
    /// counter instance: the loser of the insert race discards its
    /// candidate and returns the winner's.
    pub fn get_or_create(&self, name: &str) -> Arc<TimingCounter> {
        {
            let counters = read(&self.counters);
            if let Some(counter) = counters.get(name) {
                return counter.clone();
            }
        }

        let mut counters = write(&self.counters);
        if let Some(counter) = counters.get(name) {
            // Lost the creation race; the first insert wins.
            return counter.clone();
        }

        debug!(name = %name, "Creating timing counter");
        let counter = Arc::new(TimingCounter::new(name));
        counters.insert(name.to_string(), counter.clone());
        counter
    }

    /// Get an existing counter without creating one.
    pub fn get(&self, name: &str) -> Option<Arc<TimingCounter>> {
        read(&self.counters).get(name).cloned()
    }

    /// Names of all counters created so far, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = read(&self.counters).keys().cloned().collect();
        names.sort();
        names
    }

    /// Snapshots of every counter, sorted by name.
    pub fn snapshot_all(&self) -> Vec<CounterSnapshot> {
        let mut snapshots: Vec<CounterSnapshot> = read(&self.counters)
            .values()
            .map(|counter| counter.snapshot())
            .collect();
        snapshots.sort_by(|a, b| a.name.cmp(&b.name));
        snapshots
    }

    /// Reset every counter to zero. Intended for test isolation.
    pub fn reset_all(&self) {
        for counter in read(&self.counters).values() {
            counter.reset();
        }
    }

    /// Number of counters created so far.
    pub fn len(&self) -> usize {
        read(&self.counters).len()
    }

    /// Whether no counter has been created yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CounterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Counter state is atomic, so a panic while holding the map lock leaves
// nothing half-written; recover the guard instead of propagating poison.
fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
