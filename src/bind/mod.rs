//! Bind-time assembly of monitors.
//!
//! The advice installer discovers monitored methods; for each one it
//! hands a [`Binding`] to the [`MonitorBinder`], which resolves the
//! naming strategy, validates the declaration, materializes the
//! primary and child counters, registers the exposure view, and
//! returns the per-method [`MonitorAdvice`]. Everything that can fail
//! fails here, loudly, before the first call.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::advice::{MonitorAdvice, Strategy};
use crate::config::{validate_monitor_name, MonitorDecl};
use crate::counter::{CounterRegistry, TimingCounter};
use crate::error::ConfigError;
use crate::expose::MetricExposer;
use crate::naming::{MethodSig, MetricId, OwnerType, StrategyRegistry};

/// One monitored method, as delivered by the advice installer.
#[derive(Debug, Clone)]
pub struct Binding {
    /// The statically declared owning type.
    pub owner: OwnerType,
    /// The method signature.
    pub method: MethodSig,
    /// The parsed declaration.
    pub decl: MonitorDecl,
}

impl Binding {
    /// Bundle the three binding inputs.
    pub fn new(owner: OwnerType, method: MethodSig, decl: MonitorDecl) -> Self {
        Self {
            owner,
            method,
            decl,
        }
    }
}

/// The result of binding one method.
#[derive(Debug)]
pub struct BoundMonitor {
    /// The per-call engine, ready for use at the call site.
    pub advice: MonitorAdvice,
    /// The resolved flat counter name.
    pub name: String,
    /// The identifier the counter was exposed under.
    pub metric_id: MetricId,
}

/// Assembles a [`MonitorAdvice`] per binding.
///
/// Holds the process-wide collaborators: the counter registry, the
/// strategy registry (immutable after startup), and the exposer.
pub struct MonitorBinder {
    counters: Arc<CounterRegistry>,
    strategies: Arc<StrategyRegistry>,
    exposer: Arc<dyn MetricExposer>,
}

impl MonitorBinder {
    /// Create a binder over the given collaborators.
    pub fn new(
        counters: Arc<CounterRegistry>,
        strategies: Arc<StrategyRegistry>,
        exposer: Arc<dyn MetricExposer>,
    ) -> Self {
        Self {
            counters,
            strategies,
            exposer,
        }
    }

    /// Bind one method.
    ///
    /// A [`ConfigError`] aborts this binding only; the installer
    /// decides whether to abort the whole registration pass.
    pub fn bind(&self, binding: &Binding) -> Result<BoundMonitor, ConfigError> {
        self.try_bind(binding).inspect_err(|err| {
            warn!(
                owner = %binding.owner.qualified(),
                method = %binding.method.describe(),
                error = %err,
                "Rejecting monitor binding"
            );
        })
    }

    fn try_bind(&self, binding: &Binding) -> Result<BoundMonitor, ConfigError> {
        let strategy = self.strategies.resolve(&binding.owner);

        let name = strategy.counter_name(&binding.decl, &binding.owner, &binding.method)?;
        // Strategies may return anything; enforce the name character
        // class on the final result, declared or derived.
        validate_monitor_name(&name)?;

        let metric_id = strategy.metric_id(&binding.decl, &binding.owner, &binding.method)?;

        let primary = self.counters.get_or_create(&name);
        let children = self.child_counters(&name, &binding.decl);

        let advice = MonitorAdvice::new(primary.clone(), children, binding.decl.exceptions.clone())?;

        self.exposer.register(primary, metric_id.clone())?;

        info!(
            name = %name,
            id = %metric_id,
            owner = %binding.owner.qualified(),
            method = %binding.method.describe(),
            "Bound monitor"
        );

        Ok(BoundMonitor {
            advice,
            name,
            metric_id,
        })
    }

    /// Materialize one child counter per distinct segregate child name,
    /// registered as `<primary>.<child>`.
    fn child_counters(
        &self,
        primary_name: &str,
        decl: &MonitorDecl,
    ) -> HashMap<String, Arc<TimingCounter>> {
        let mut children = HashMap::new();
        for filter in &decl.exceptions {
            if filter.strategy() != Strategy::Segregate {
                continue;
            }
            children.entry(filter.child().to_string()).or_insert_with(|| {
                self.counters
                    .get_or_create(&format!("{primary_name}.{}", filter.child()))
            });
        }
        children
    }
}
