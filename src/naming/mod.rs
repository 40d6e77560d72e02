//! Monitor naming: strategies, identity descriptors, and the resolver.
//!
//! A [`NamingStrategy`] turns a method identity into a flat counter
//! name and a structured [`MetricId`] for external exposure. Strategies
//! are registered per owning type in a [`StrategyRegistry`] and
//! resolved once at bind time; the [`DefaultNamingStrategy`] is the
//! universal fallback.

mod default;
mod metric_id;
mod registry;

pub use default::DefaultNamingStrategy;
pub use metric_id::MetricId;
pub use registry::StrategyRegistry;

use crate::config::MonitorDecl;
use crate::error::ConfigError;

/// Policy for naming one monitored method.
///
/// Implementations are stateless pure computations over immutable
/// inputs and must be cheap: both methods run once per binding, never
/// per call.
pub trait NamingStrategy: Send + Sync {
    /// Produce the flat counter name for the method.
    ///
    /// A non-empty declared name wins verbatim; duplicate names across
    /// methods are permitted and route to the same counter.
    fn counter_name(
        &self,
        decl: &MonitorDecl,
        owner: &OwnerType,
        method: &MethodSig,
    ) -> Result<String, ConfigError>;

    /// Produce the structured identifier the counter is exposed under.
    fn metric_id(
        &self,
        decl: &MonitorDecl,
        owner: &OwnerType,
        method: &MethodSig,
    ) -> Result<MetricId, ConfigError>;
}

/// The statically declared owning type of a monitored method.
///
/// Carries the owner's dotted qualified name and its ancestor closure
/// (supertypes and implemented interfaces), most-derived first. The
/// closure is computed by the advice installer once per distinct owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerType {
    qualified: String,
    ancestors: Vec<String>,
}

impl OwnerType {
    /// Marker for the universal root type. Hierarchy entries equal to
    /// this are skipped during strategy resolution, so a registration
    /// against the root can never shadow the default strategy.
    pub const UNIVERSAL_ROOT: &'static str = "Any";

    /// Describe an owner by its dotted qualified name.
    pub fn new(qualified: impl Into<String>) -> Self {
        Self {
            qualified: qualified.into(),
            ancestors: Vec::new(),
        }
    }

    /// Attach the ancestor closure, most-derived first.
    pub fn with_ancestors<I, S>(mut self, ancestors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ancestors = ancestors.into_iter().map(Into::into).collect();
        self
    }

    /// The dotted qualified name, e.g. `app.services.Widget`.
    pub fn qualified(&self) -> &str {
        &self.qualified
    }

    /// The final name segment, e.g. `Widget`.
    pub fn simple_name(&self) -> &str {
        match self.qualified.rfind('.') {
            Some(dot) => &self.qualified[dot + 1..],
            None => &self.qualified,
        }
    }

    /// The namespace portion, empty when the name has no dots.
    pub fn namespace(&self) -> &str {
        match self.qualified.rfind('.') {
            Some(dot) => &self.qualified[..dot],
            None => "",
        }
    }

    /// The type hierarchy in resolution order: the owner itself, then
    /// its ancestors most-derived first, with the universal root
    /// filtered out.
    pub fn hierarchy(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.qualified.as_str())
            .chain(self.ancestors.iter().map(String::as_str))
            .filter(|name| *name != Self::UNIVERSAL_ROOT)
    }
}

/// A monitored method's signature: name plus ordered qualified
/// parameter type names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSig {
    name: String,
    params: Vec<String>,
}

impl MethodSig {
    /// A niladic method.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Attach the ordered parameter type names.
    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    /// The method name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The signature description, e.g. `compute(java.lang.String, java.lang.Integer)`.
    pub fn describe(&self) -> String {
        format!("{}({})", self.name, self.params.join(", "))
    }
}
