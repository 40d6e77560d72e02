//! Timing counters and the process-wide counter registry.
//!
//! A [`TimingCounter`] accumulates invocation count and elapsed time
//! for one monitor name. The [`CounterRegistry`] maps names to
//! counters, creating them lazily on first reference. Two methods that
//! resolve to the same name share one counter.

mod registry;
mod timing;

pub use registry::CounterRegistry;
pub use timing::{CounterSnapshot, TimingCounter};
