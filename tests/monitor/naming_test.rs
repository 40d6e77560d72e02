//! Naming and strategy-resolution integration tests.

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;

use common::{create_binder, init_tracing, widget_binding, APP_ROOT};
use spanwatch::{
    Binding, ConfigError, CounterRegistry, DefaultNamingStrategy, InMemoryExposer, MethodSig,
    MetricId, MonitorBinder, MonitorDecl, NamingStrategy, OwnerType, StrategyRegistry,
};

#[test]
fn test_derived_name_matches_documented_transformation() {
    init_tracing();
    let (_, _, binder) = create_binder();

    let bound = binder.bind(&widget_binding(MonitorDecl::default())).unwrap();

    assert_eq!(bound.name, "services_Widget_compute_java_lang_String_");
}

#[test]
fn test_derived_metric_id_carries_package_class_method() {
    init_tracing();
    let (_, exposer, binder) = create_binder();

    let bound = binder.bind(&widget_binding(MonitorDecl::default())).unwrap();

    assert_eq!(
        bound.metric_id.to_string(),
        "app:package=services,class=Widget,method=compute(java.lang.String),type=Monitor"
    );
    assert!(exposer.is_registered(&bound.metric_id));
}

#[test]
fn test_exposed_snapshot_tracks_the_counter() {
    init_tracing();
    let (_, exposer, binder) = create_binder();
    let bound = binder.bind(&widget_binding(MonitorDecl::default())).unwrap();

    let _: Result<(), common::TimeoutError> = bound.advice.invoke(|| Ok(()));

    let snapshot = exposer.snapshot(&bound.metric_id).unwrap();
    assert_eq!(snapshot.name, bound.name);
    assert_eq!(snapshot.invocations, 1);
}

/// Strategy that names monitors after a fixed tag, the way a service
/// override would.
struct TaggedStrategy(&'static str);

impl NamingStrategy for TaggedStrategy {
    fn counter_name(
        &self,
        _decl: &MonitorDecl,
        _owner: &OwnerType,
        _method: &MethodSig,
    ) -> Result<String, ConfigError> {
        Ok(format!("{}_Renamed_Service", self.0))
    }

    fn metric_id(
        &self,
        _decl: &MonitorDecl,
        owner: &OwnerType,
        method: &MethodSig,
    ) -> Result<MetricId, ConfigError> {
        MetricId::builder(self.0)
            .with("class", owner.simple_name())
            .with("method", method.describe().replace(',', ";"))
            .with("type", "Monitor")
            .build()
    }
}

fn binder_with_strategies() -> (Arc<CounterRegistry>, MonitorBinder) {
    let counters = Arc::new(CounterRegistry::new());
    let strategies = Arc::new(
        StrategyRegistry::new(Arc::new(DefaultNamingStrategy::new(APP_ROOT)))
            .with_strategy("app.services.Renamed", Arc::new(TaggedStrategy("One")))
            .with_strategy("app.services.SubMonitored", Arc::new(TaggedStrategy("Extended"))),
    );
    let binder = MonitorBinder::new(
        counters.clone(),
        strategies,
        Arc::new(InMemoryExposer::new()),
    );
    (counters, binder)
}

#[test]
fn test_registered_owner_uses_its_strategy() {
    init_tracing();
    let (counters, binder) = binder_with_strategies();

    let bound = binder
        .bind(&Binding::new(
            OwnerType::new("app.services.Renamed"),
            MethodSig::new("monitoredMethod"),
            MonitorDecl::default(),
        ))
        .unwrap();

    assert_eq!(bound.name, "One_Renamed_Service");
    assert!(counters.get("One_Renamed_Service").is_some());
}

#[test]
fn test_interface_registration_applies_to_implementor() {
    init_tracing();
    let (_, binder) = binder_with_strategies();

    // The concrete type has no direct registration; its implemented
    // interface does.
    let bound = binder
        .bind(&Binding::new(
            OwnerType::new("app.services.impl.RenamedImpl")
                .with_ancestors(["app.services.Renamed"]),
            MethodSig::new("monitoredMethod"),
            MonitorDecl::default(),
        ))
        .unwrap();

    assert_eq!(bound.name, "One_Renamed_Service");
}

#[test]
fn test_extended_interface_resolves_most_derived_first() {
    init_tracing();
    let (_, binder) = binder_with_strategies();

    let bound = binder
        .bind(&Binding::new(
            OwnerType::new("app.services.impl.SubMonitoredImpl")
                .with_ancestors(["app.services.SubMonitored", "app.services.Renamed"]),
            MethodSig::new("monitoredMethod"),
            MonitorDecl::default(),
        ))
        .unwrap();

    assert_eq!(bound.name, "Extended_Renamed_Service");
}

#[test]
fn test_unregistered_owner_falls_back_to_default() {
    init_tracing();
    let (_, binder) = binder_with_strategies();

    let bound = binder
        .bind(&Binding::new(
            OwnerType::new("app.services.NotMonitored").with_ancestors(["app.services.Plain"]),
            MethodSig::new("methodOne"),
            MonitorDecl::default(),
        ))
        .unwrap();

    assert_eq!(bound.name, "services_NotMonitored_methodOne__");
}
