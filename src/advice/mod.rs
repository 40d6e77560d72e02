//! Per-call monitoring advice.
//!
//! One [`MonitorAdvice`] instance wraps one monitored method. It is
//! constructed at bind time with its counters and filter list already
//! resolved; each invocation then runs standalone on the calling
//! thread:
//!
//! ```ignore
//! let bound = binder.bind(&binding)?;
//!
//! // At every call site of the monitored method:
//! let result = bound.advice.invoke(|| widget.compute(input))?;
//! ```
//!
//! Errors are classified against the method's ordered
//! [`ExceptionFilter`] list: the first filter containing the error's
//! runtime type decides whether the sample is included with the
//! successful calls, segregated onto a child counter, or dropped. The
//! error itself is always re-raised unchanged.

mod filter;
mod monitor;

pub use filter::{ErrorMatch, ExceptionFilter, Strategy, DEFAULT_CHILD};
pub use monitor::{BoxError, MonitorAdvice};
