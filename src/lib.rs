//! Spanwatch - call-interception monitoring
//!
//! Wraps selected methods of a service or component to measure
//! invocation latency, count invocations, and route exceptional
//! outcomes into separate or merged counters, all addressable through
//! a hierarchical naming scheme usable both for programmatic lookup
//! and for external management exposure.
//!
//! Method discovery and proxy installation are the installer's job;
//! this crate takes over once a method is declared monitored: the
//! [`bind::MonitorBinder`] resolves names and counters once, and the
//! resulting [`advice::MonitorAdvice`] runs on every call.

pub mod advice;
pub mod bind;
pub mod config;
pub mod counter;
pub mod error;
pub mod expose;
pub mod naming;

pub use advice::{ErrorMatch, ExceptionFilter, MonitorAdvice, Strategy};
pub use bind::{Binding, BoundMonitor, MonitorBinder};
pub use config::{MatcherCatalog, MonitorDecl, MonitorManifest};
pub use counter::{CounterRegistry, CounterSnapshot, TimingCounter};
pub use error::ConfigError;
pub use expose::{InMemoryExposer, MetricExposer, NoopExposer};
pub use naming::{DefaultNamingStrategy, MethodSig, MetricId, NamingStrategy, OwnerType, StrategyRegistry};
