//! The default naming strategy.

use super::{MethodSig, MetricId, NamingStrategy, OwnerType};
use crate::config::MonitorDecl;
use crate::error::ConfigError;

/// Namespace-relative naming, used for every owner without an explicit
/// strategy registration.
///
/// Flat names are synthesized from the owner's qualified name and the
/// method signature, made relative to the application root namespace,
/// and flattened to a single identifier segment. Metric ids use the
/// `package=`/`class=`/`method=` attribute convention with a fixed
/// `type=Monitor` marker.
#[derive(Debug, Clone)]
pub struct DefaultNamingStrategy {
    root: String,
    root_prefix: String,
}

impl DefaultNamingStrategy {
    /// Create the strategy for an application rooted at `app_root`
    /// (e.g. `app` for types like `app.services.Widget`).
    pub fn new(app_root: impl Into<String>) -> Self {
        let root = app_root.into();
        let root_prefix = format!("{root}.");
        Self { root, root_prefix }
    }

    /// The portion of the owner's name under the application root, or
    /// `None` for owners outside it.
    fn relative_to_root<'a>(&self, owner: &'a OwnerType) -> Option<&'a str> {
        if self.root.is_empty() {
            return None;
        }
        owner.qualified().strip_prefix(&self.root_prefix)
    }
}

impl NamingStrategy for DefaultNamingStrategy {
    /// Builds a flat name of the shape
    /// `services_Widget_compute_java_lang_String_` for
    /// `app.services.Widget.compute(java.lang.String)` under root `app`.
    fn counter_name(
        &self,
        decl: &MonitorDecl,
        owner: &OwnerType,
        method: &MethodSig,
    ) -> Result<String, ConfigError> {
        // Declared names win verbatim; duplicates intentionally share
        // one counter.
        if !decl.name.is_empty() {
            return Ok(decl.name.clone());
        }

        let mut description = format!("{}.{}", owner.qualified(), method.describe());
        if !self.root.is_empty() {
            if let Some(relative) = description.strip_prefix(&self.root_prefix) {
                description = relative.to_string();
            }
        }

        Ok(flatten(&description))
    }

    fn metric_id(
        &self,
        decl: &MonitorDecl,
        owner: &OwnerType,
        method: &MethodSig,
    ) -> Result<MetricId, ConfigError> {
        if !decl.metric_id.is_empty() {
            return MetricId::parse(&decl.metric_id);
        }

        // The method attribute carries the declared name when present,
        // otherwise the synthesized signature. Commas are not valid in
        // attribute values, so the parameter separator becomes ';'.
        let description = if decl.name.is_empty() {
            method.describe()
        } else {
            decl.name.clone()
        };
        let method_attr = description.replace(',', ";");

        let mut builder = match self.relative_to_root(owner) {
            Some(relative) => {
                let package = match relative.rfind('.') {
                    Some(dot) => &relative[..dot],
                    None => "",
                };
                let builder = MetricId::builder(&self.root);
                if package.is_empty() {
                    builder
                } else {
                    builder.with("package", package)
                }
            }
            None => {
                let domain = if owner.namespace().is_empty() {
                    owner.qualified()
                } else {
                    owner.namespace()
                };
                MetricId::builder(domain)
            }
        };

        builder = builder
            .with("class", owner.simple_name())
            .with("method", method_attr)
            .with("type", "Monitor");
        builder.build()
    }
}

/// Strip whitespace and flatten separator punctuation to underscores.
fn flatten(description: &str) -> String {
    description
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '.' | '(' | ')' | ',' => '_',
            other => other,
        })
        .collect()
}
