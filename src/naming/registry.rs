//! Strategy resolution by owning type.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::{NamingStrategy, OwnerType};

/// Maps owning types to naming strategies.
///
/// Built once at startup and read-only thereafter; resolution walks the
/// owner's hierarchy most-derived first and returns the first
/// registered match, falling back to the default strategy. Registration
/// is many-to-one: several types may share one strategy instance.
pub struct StrategyRegistry {
    strategies: HashMap<String, Arc<dyn NamingStrategy>>,
    default: Arc<dyn NamingStrategy>,
}

impl StrategyRegistry {
    /// Create a registry with only the universal fallback.
    pub fn new(default: Arc<dyn NamingStrategy>) -> Self {
        Self {
            strategies: HashMap::new(),
            default,
        }
    }

    /// Register a strategy for the type named `type_name`.
    pub fn with_strategy(
        mut self,
        type_name: impl Into<String>,
        strategy: Arc<dyn NamingStrategy>,
    ) -> Self {
        self.strategies.insert(type_name.into(), strategy);
        self
    }

    /// Resolve the strategy for an owner.
    ///
    /// Walks the owner's hierarchy (itself, then ancestors, the
    /// universal root excluded) and takes the first explicit
    /// registration; otherwise the default.
    pub fn resolve(&self, owner: &OwnerType) -> Arc<dyn NamingStrategy> {
        for type_name in owner.hierarchy() {
            if let Some(strategy) = self.strategies.get(type_name) {
                debug!(owner = %owner.qualified(), matched = %type_name, "Resolved naming strategy");
                return strategy.clone();
            }
        }
        self.default.clone()
    }

    /// Number of explicit registrations.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Whether only the fallback is present.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
