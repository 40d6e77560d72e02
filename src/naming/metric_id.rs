//! Structured metric identifiers for external exposure.

use std::fmt;

use crate::error::ConfigError;

/// A hierarchical identifier of the form `domain:key=value,key=value`.
///
/// Attribute order is preserved as declared. Syntax is validated on
/// construction: malformed input fails fast with a descriptive
/// [`ConfigError`] rather than being silently truncated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricId {
    domain: String,
    attributes: Vec<(String, String)>,
}

// Characters that would make the rendered form ambiguous.
const DOMAIN_FORBIDDEN: &[char] = &[':', '*', '?', '"', ',', '=', '\n'];
const KEY_FORBIDDEN: &[char] = &[':', '*', '?', '"', ',', '=', ' ', '\n'];
const VALUE_FORBIDDEN: &[char] = &[':', '*', '?', '"', ',', '=', '\n'];

impl MetricId {
    /// Start an identifier in `domain`. Attributes are added with
    /// [`MetricId::with`] and validated by [`MetricId::build`].
    pub fn builder(domain: impl Into<String>) -> MetricIdBuilder {
        MetricIdBuilder {
            domain: domain.into(),
            attributes: Vec::new(),
        }
    }

    /// Parse the rendered `domain:key=value,...` form.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let malformed = |reason: &str| ConfigError::MalformedMetricId {
            id: input.to_string(),
            reason: reason.to_string(),
        };

        let (domain, rest) = input
            .split_once(':')
            .ok_or_else(|| malformed("missing ':' between domain and attributes"))?;

        let mut builder = Self::builder(domain);
        for pair in rest.split(',') {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| malformed("attribute without '='"))?;
            builder = builder.with(key, value);
        }
        builder.build()
    }

    /// The domain segment.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The ordered attribute list.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Look up one attribute value by key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.domain)?;
        for (i, (key, value)) in self.attributes.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

/// Builder for [`MetricId`]; validation happens in [`MetricIdBuilder::build`].
#[derive(Debug, Clone)]
pub struct MetricIdBuilder {
    domain: String,
    attributes: Vec<(String, String)>,
}

impl MetricIdBuilder {
    /// Append one attribute, preserving declaration order.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Validate and produce the identifier.
    pub fn build(self) -> Result<MetricId, ConfigError> {
        let rendered = || {
            let attrs: Vec<String> = self
                .attributes
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            format!("{}:{}", self.domain, attrs.join(","))
        };
        let malformed = |reason: String| ConfigError::MalformedMetricId {
            id: rendered(),
            reason,
        };

        if self.domain.trim().is_empty() {
            return Err(malformed("empty domain".to_string()));
        }
        if let Some(bad) = self.domain.chars().find(|c| DOMAIN_FORBIDDEN.contains(c)) {
            return Err(malformed(format!("'{bad}' not allowed in domain")));
        }
        if self.attributes.is_empty() {
            return Err(malformed("at least one attribute is required".to_string()));
        }

        for (key, value) in &self.attributes {
            if key.is_empty() {
                return Err(malformed("empty attribute key".to_string()));
            }
            if let Some(bad) = key.chars().find(|c| KEY_FORBIDDEN.contains(c)) {
                return Err(malformed(format!("'{bad}' not allowed in key '{key}'")));
            }
            if value.trim().is_empty() {
                return Err(malformed(format!("empty value for key '{key}'")));
            }
            if let Some(bad) = value.chars().find(|c| VALUE_FORBIDDEN.contains(c)) {
                return Err(malformed(format!("'{bad}' not allowed in value of '{key}'")));
            }
            if self.attributes.iter().filter(|(k, _)| k == key).count() > 1 {
                return Err(malformed(format!("duplicate attribute key '{key}'")));
            }
        }

        Ok(MetricId {
            domain: self.domain,
            attributes: self.attributes,
        })
    }
}
