//! Configuration error taxonomy.
//!
//! Every variant is a bind-time defect: raised while a monitor is being
//! declared, named, or registered — never during a monitored call.

/// Errors raised while building or registering a monitor.
///
/// These indicate a setup defect and abort the binding that produced
/// them. They are never retried.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A declared or generated monitor name contains characters outside
    /// the allowed set.
    #[error("invalid monitor name '{0}': must match [-_\\[\\]A-Za-z0-9.,@$%()<>]+")]
    InvalidName(String),

    /// A structured metric identifier failed syntax validation.
    #[error("malformed metric id '{id}': {reason}")]
    MalformedMetricId { id: String, reason: String },

    /// A segregate filter names a child counter that was never bound.
    #[error("segregate filter references child counter '{0}' which is not bound")]
    MissingChildCounter(String),

    /// The same metric identifier was registered with the exposer twice.
    #[error("metric id '{0}' is already registered")]
    DuplicateRegistration(String),

    /// A manifest filter references an error matcher that is not in the
    /// catalog.
    #[error("unknown error matcher '{0}'")]
    UnknownMatcher(String),

    /// Reading a monitor manifest from disk failed.
    #[error("failed to read monitor manifest '{0}': {1}")]
    FileRead(String, String),

    /// Parsing a monitor manifest failed.
    #[error("failed to parse monitor manifest: {0}")]
    Parse(String),
}
