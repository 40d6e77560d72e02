//! External exposure boundary.
//!
//! A [`MetricExposer`] publishes a read view of a counter under its
//! structured [`MetricId`]. The management transport behind it is out
//! of scope; [`InMemoryExposer`] serves local inspection and tests,
//! [`NoopExposer`] serves installers that do not expose at all.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::counter::{CounterSnapshot, TimingCounter};
use crate::error::ConfigError;
use crate::naming::MetricId;

/// Publishes counters to an external management transport.
pub trait MetricExposer: Send + Sync {
    /// Register a read view of `counter` under `id`.
    ///
    /// Registration is not idempotent: a second registration of the
    /// same identifier is a configuration error and surfaces
    /// immediately.
    fn register(&self, counter: Arc<TimingCounter>, id: MetricId) -> Result<(), ConfigError>;
}

/// Exposer that keeps registered views in process memory.
pub struct InMemoryExposer {
    entries: RwLock<HashMap<String, Arc<TimingCounter>>>,
}

impl InMemoryExposer {
    /// Create an empty exposer.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Whether `id` has been registered.
    pub fn is_registered(&self, id: &MetricId) -> bool {
        self.read().contains_key(&id.to_string())
    }

    /// Snapshot of the counter registered under `id`, if any.
    pub fn snapshot(&self, id: &MetricId) -> Option<CounterSnapshot> {
        self.read().get(&id.to_string()).map(|c| c.snapshot())
    }

    /// Rendered identifiers of everything registered, sorted.
    pub fn registered_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<TimingCounter>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryExposer {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricExposer for InMemoryExposer {
    fn register(&self, counter: Arc<TimingCounter>, id: MetricId) -> Result<(), ConfigError> {
        let key = id.to_string();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if entries.contains_key(&key) {
            return Err(ConfigError::DuplicateRegistration(key));
        }

        info!(id = %key, counter = %counter.name(), "Registering metric view");
        entries.insert(key, counter);
        Ok(())
    }
}

/// Exposer that publishes nothing.
pub struct NoopExposer;

impl MetricExposer for NoopExposer {
    fn register(&self, _counter: Arc<TimingCounter>, _id: MetricId) -> Result<(), ConfigError> {
        Ok(())
    }
}
