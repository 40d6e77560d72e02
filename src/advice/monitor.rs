//! The per-method classification and timing engine.

use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{trace, warn};

use super::filter::{ExceptionFilter, Strategy};
use crate::counter::TimingCounter;
use crate::error::ConfigError;

/// Boxed error form accepted by [`MonitorAdvice::invoke_dyn`].
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Advice bound to one monitored method.
///
/// Times every invocation, classifies errors against the method's
/// ordered filter list, and updates at most one counter per call. The
/// wrapped call's outcome is always returned unchanged: errors keep
/// their identity, type, and message; only the bookkeeping varies.
#[derive(Debug)]
pub struct MonitorAdvice {
    primary: Arc<TimingCounter>,
    children: HashMap<String, Arc<TimingCounter>>,
    filters: Vec<ExceptionFilter>,
}

impl MonitorAdvice {
    /// Build the advice from the resolved primary counter, the child
    /// counter map, and the declared filter list.
    ///
    /// An empty filter list gets the implicit catch-all Include filter.
    /// Every `Segregate` filter must resolve a child counter here, at
    /// bind time; a missing child is a [`ConfigError`], never a
    /// call-time surprise.
    pub fn new(
        primary: Arc<TimingCounter>,
        children: HashMap<String, Arc<TimingCounter>>,
        mut filters: Vec<ExceptionFilter>,
    ) -> Result<Self, ConfigError> {
        if filters.is_empty() {
            filters.push(ExceptionFilter::catch_all());
        }

        for filter in &filters {
            if filter.strategy() == Strategy::Segregate && !children.contains_key(filter.child()) {
                return Err(ConfigError::MissingChildCounter(filter.child().to_string()));
            }
        }

        Ok(Self {
            primary,
            children,
            filters,
        })
    }

    /// Invoke the wrapped call, timing and classifying its outcome.
    ///
    /// Runs entirely on the calling thread and holds no lock across the
    /// call. A call that never returns records nothing.
    pub fn invoke<T, E>(&self, call: impl FnOnce() -> Result<T, E>) -> Result<T, E>
    where
        E: Error + 'static,
    {
        let start = Instant::now();
        let result = call();
        let elapsed = start.elapsed();

        match &result {
            Ok(_) => self.primary.record(elapsed),
            Err(err) => self.classify(err, elapsed),
        }

        result
    }

    /// [`MonitorAdvice::invoke`] for calls returning boxed errors.
    /// Classification applies to the concrete type inside the box.
    pub fn invoke_dyn<T>(&self, call: impl FnOnce() -> Result<T, BoxError>) -> Result<T, BoxError> {
        let start = Instant::now();
        let result = call();
        let elapsed = start.elapsed();

        match &result {
            Ok(_) => self.primary.record(elapsed),
            Err(err) => self.classify(err.as_ref(), elapsed),
        }

        result
    }

    /// The primary counter this advice records to.
    pub fn primary(&self) -> &Arc<TimingCounter> {
        &self.primary
    }

    /// The child counter bound to `name`, if any.
    pub fn child(&self, name: &str) -> Option<&Arc<TimingCounter>> {
        self.children.get(name)
    }

    /// Walk the filter list in declared order; the first filter
    /// containing the error decides the outcome and scanning stops.
    fn classify(&self, err: &(dyn Error + 'static), elapsed: Duration) {
        for filter in &self.filters {
            if !filter.matches(err) {
                continue;
            }

            match filter.strategy() {
                Strategy::Ignore => {
                    trace!(counter = %self.primary.name(), error = %err, "Ignoring error");
                }
                Strategy::Include => {
                    trace!(counter = %self.primary.name(), error = %err, "Including error");
                    self.primary.record(elapsed);
                }
                Strategy::Segregate => match self.children.get(filter.child()) {
                    Some(child) => {
                        trace!(counter = %child.name(), error = %err, "Segregating error");
                        child.record(elapsed);
                    }
                    None => {
                        // Construction validated this; keep the sample
                        // anyway if it ever happens.
                        warn!(
                            child = %filter.child(),
                            "Segregate filter has no bound child counter; including"
                        );
                        self.primary.record(elapsed);
                    }
                },
            }
            return;
        }

        // No filter matched. The implicit catch-all makes this
        // unreachable for bound monitors; treat as Include so the
        // sample still lands somewhere.
        trace!(counter = %self.primary.name(), error = %err, "No filter matched; including");
        self.primary.record(elapsed);
    }
}
