//! Monitor declarations and the manifest surface.
//!
//! The advice installer owns the declaration syntax; this module holds
//! the parsed form it hands over: one immutable [`MonitorDecl`] per
//! method. A YAML manifest form is provided for installers that read
//! declarations from a file, with a [`MatcherCatalog`] resolving
//! declared matcher names to runtime [`ErrorMatch`] tests.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::advice::{ErrorMatch, ExceptionFilter, Strategy, DEFAULT_CHILD};
use crate::error::ConfigError;

// Punctuation allowed in declared monitor names besides ASCII
// alphanumerics.
const NAME_PUNCTUATION: &[char] = &[
    '-', '_', '[', ']', '.', ',', '@', '$', '%', '(', ')', '<', '>',
];

/// Check a monitor name against the allowed character class
/// `[-_\[\]A-Za-z0-9.,@$%()<>]+`.
pub fn validate_monitor_name(name: &str) -> Result<(), ConfigError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || NAME_PUNCTUATION.contains(&c));

    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidName(name.to_string()))
    }
}

/// Declared monitoring configuration for one method.
///
/// Immutable once produced by the installer; shared read-only by every
/// invocation of the method.
#[derive(Debug, Clone, Default)]
pub struct MonitorDecl {
    /// Explicit counter name. Empty means derive one; duplicates across
    /// methods share a counter.
    pub name: String,
    /// Explicit metric id override in rendered `domain:k=v,...` form.
    /// Empty means derive one.
    pub metric_id: String,
    /// Ordered exception filters. Empty means the implicit catch-all
    /// Include filter.
    pub exceptions: Vec<ExceptionFilter>,
}

impl MonitorDecl {
    /// A declaration with an explicit counter name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the metric id override.
    pub fn with_metric_id(mut self, metric_id: impl Into<String>) -> Self {
        self.metric_id = metric_id.into();
        self
    }

    /// Append an exception filter, preserving declaration order.
    pub fn with_filter(mut self, filter: ExceptionFilter) -> Self {
        self.exceptions.push(filter);
        self
    }
}

/// Manifest form of one method's declaration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MonitorSpec {
    /// Explicit counter name, empty to derive.
    pub name: String,
    /// Explicit metric id override, empty to derive.
    pub metric_id: String,
    /// Ordered filter list.
    pub exceptions: Vec<FilterSpec>,
}

impl MonitorSpec {
    /// Resolve matcher names against `catalog`, producing the runtime
    /// declaration. Fails fast on an invalid name or unknown matcher.
    pub fn resolve(&self, catalog: &MatcherCatalog) -> Result<MonitorDecl, ConfigError> {
        if !self.name.is_empty() {
            validate_monitor_name(&self.name)?;
        }

        let mut exceptions = Vec::with_capacity(self.exceptions.len());
        for spec in &self.exceptions {
            let mut filter = ExceptionFilter::new(spec.strategy).with_child(spec.child.clone());
            for matcher_name in &spec.on {
                filter = filter.on(catalog.get(matcher_name)?);
            }
            exceptions.push(filter);
        }

        Ok(MonitorDecl {
            name: self.name.clone(),
            metric_id: self.metric_id.clone(),
            exceptions,
        })
    }
}

/// Manifest form of one exception filter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    /// Matcher names, resolved against the [`MatcherCatalog`].
    pub on: Vec<String>,
    /// Handling strategy, `include` when omitted.
    pub strategy: Strategy,
    /// Child counter name for `segregate`, `errors` when omitted.
    pub child: String,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            on: Vec::new(),
            strategy: Strategy::default(),
            child: DEFAULT_CHILD.to_string(),
        }
    }
}

/// Named runtime matchers available to manifest declarations.
///
/// The catalog is assembled by the installer at startup; `any` is
/// always available.
pub struct MatcherCatalog {
    matchers: HashMap<String, ErrorMatch>,
}

impl MatcherCatalog {
    /// A catalog containing only the built-in `any` matcher.
    pub fn new() -> Self {
        let mut matchers = HashMap::new();
        matchers.insert("any".to_string(), ErrorMatch::any());
        Self { matchers }
    }

    /// Register a matcher under `name`.
    pub fn with_matcher(mut self, name: impl Into<String>, matcher: ErrorMatch) -> Self {
        self.matchers.insert(name.into(), matcher);
        self
    }

    fn get(&self, name: &str) -> Result<ErrorMatch, ConfigError> {
        self.matchers
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownMatcher(name.to_string()))
    }
}

impl Default for MatcherCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// A YAML manifest of monitor declarations, keyed by the installer's
/// method identifier.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MonitorManifest {
    /// Declarations by method key.
    pub monitors: BTreeMap<String, MonitorSpec>,
}

impl MonitorManifest {
    /// Load a manifest from a YAML file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;

        Self::parse(&content)
    }

    /// Parse a manifest from YAML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// The declaration for a method key, if present.
    pub fn get(&self, method_key: &str) -> Option<&MonitorSpec> {
        self.monitors.get(method_key)
    }
}
