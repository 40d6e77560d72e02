//! Exception classification filters.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Default child counter name for segregated errors.
pub const DEFAULT_CHILD: &str = "errors";

/// How a matched error affects the monitor's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Record the erroring call on its own child counter.
    Segregate,
    /// Record the erroring call on the primary counter, exactly like a
    /// successful call.
    #[default]
    Include,
    /// Record nothing.
    Ignore,
}

/// A runtime test against an error's concrete type.
///
/// Rust has no class inheritance, so "assignable to" is expressed with
/// three matcher shapes: a concrete type (downcast), a named predicate
/// (trait or category membership — the analog of matching a
/// supertype), and the catch-all. Matching inspects the error value
/// itself, not its `source()` chain.
#[derive(Clone)]
pub struct ErrorMatch {
    label: String,
    test: MatchTest,
}

#[derive(Clone)]
enum MatchTest {
    Any,
    Test(Arc<dyn Fn(&(dyn Error + 'static)) -> bool + Send + Sync>),
}

impl ErrorMatch {
    /// Match errors of the concrete type `E`.
    pub fn of<E: Error + 'static>() -> Self {
        Self {
            label: std::any::type_name::<E>().to_string(),
            test: MatchTest::Test(Arc::new(|err: &(dyn Error + 'static)| err.is::<E>())),
        }
    }

    /// Match every error. The analog of listing the root error type.
    pub fn any() -> Self {
        Self {
            label: "any".to_string(),
            test: MatchTest::Any,
        }
    }

    /// Match errors satisfying `test`, labeled for logs and manifests.
    pub fn when(
        label: impl Into<String>,
        test: impl Fn(&(dyn Error + 'static)) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            test: MatchTest::Test(Arc::new(test)),
        }
    }

    /// The matcher's display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Test an error's runtime type.
    pub fn matches(&self, err: &(dyn Error + 'static)) -> bool {
        match &self.test {
            MatchTest::Any => true,
            MatchTest::Test(test) => test(err),
        }
    }
}

impl fmt::Debug for ErrorMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorMatch")
            .field("label", &self.label)
            .finish()
    }
}

/// One ordered classification rule for a monitored method.
///
/// Filters are evaluated in declared order and the first filter whose
/// matcher set contains the error wins; later filters are never
/// consulted. Declaring a specific type before its broader category
/// ("segregate the specific, include the general") is the intended
/// idiom.
#[derive(Debug, Clone)]
pub struct ExceptionFilter {
    matches: Vec<ErrorMatch>,
    strategy: Strategy,
    child: String,
}

impl ExceptionFilter {
    /// A filter with the given strategy, no matchers, and the default
    /// child name.
    pub fn new(strategy: Strategy) -> Self {
        Self {
            matches: Vec::new(),
            strategy,
            child: DEFAULT_CHILD.to_string(),
        }
    }

    /// The implicit catch-all appended when a method declares no
    /// filters: every error is included with the successful calls.
    pub fn catch_all() -> Self {
        Self::new(Strategy::Include).on(ErrorMatch::any())
    }

    /// Add a matcher to this filter's set.
    pub fn on(mut self, matcher: ErrorMatch) -> Self {
        self.matches.push(matcher);
        self
    }

    /// Set the child counter name (meaningful for `Segregate`).
    /// Filters sharing a child name share one child counter.
    pub fn with_child(mut self, child: impl Into<String>) -> Self {
        self.child = child.into();
        self
    }

    /// The filter's strategy.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The child counter name.
    pub fn child(&self) -> &str {
        &self.child
    }

    /// The matcher set.
    pub fn matchers(&self) -> &[ErrorMatch] {
        &self.matches
    }

    /// Whether any matcher in the set matches the error.
    pub fn matches(&self, err: &(dyn Error + 'static)) -> bool {
        self.matches.iter().any(|matcher| matcher.matches(err))
    }
}
