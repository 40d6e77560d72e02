//! Manifest-driven declarations: YAML in, bound monitors out.

#[path = "../common/mod.rs"]
mod common;

use common::{create_binder, init_tracing, widget_binding, QueryError, TimeoutError};
use spanwatch::{ConfigError, ErrorMatch, MatcherCatalog, MonitorManifest};

const MANIFEST: &str = r#"
monitors:
  "app.services.Widget::compute":
    exceptions:
      - on: [timeout]
        strategy: segregate
        child: timeouts
      - on: [query]
        strategy: ignore
      - on: [any]
        strategy: include
  "app.services.Widget::render":
    name: widget.render
"#;

fn catalog() -> MatcherCatalog {
    MatcherCatalog::new()
        .with_matcher("timeout", ErrorMatch::of::<TimeoutError>())
        .with_matcher("query", ErrorMatch::of::<QueryError>())
}

#[test]
fn test_manifest_declaration_drives_classification() {
    init_tracing();
    let (counters, _, binder) = create_binder();

    let manifest = MonitorManifest::parse(MANIFEST).unwrap();
    let decl = manifest
        .get("app.services.Widget::compute")
        .unwrap()
        .resolve(&catalog())
        .unwrap();
    let bound = binder.bind(&widget_binding(decl)).unwrap();

    let _: Result<(), TimeoutError> = bound.advice.invoke(|| Err(TimeoutError));
    let _: Result<(), QueryError> = bound.advice.invoke(|| Err(QueryError("q".to_string())));
    let _: Result<(), common::OtherError> = bound.advice.invoke(|| Err(common::OtherError));

    let primary = counters.get(&bound.name).unwrap();
    let child = counters.get(&format!("{}.timeouts", bound.name)).unwrap();
    assert_eq!(primary.invocations(), 1); // only the included error
    assert_eq!(child.invocations(), 1); // only the timeout
}

#[test]
fn test_manifest_explicit_name_is_used() {
    init_tracing();
    let (counters, _, binder) = create_binder();

    let manifest = MonitorManifest::parse(MANIFEST).unwrap();
    let decl = manifest
        .get("app.services.Widget::render")
        .unwrap()
        .resolve(&catalog())
        .unwrap();
    let bound = binder.bind(&widget_binding(decl)).unwrap();

    assert_eq!(bound.name, "widget.render");
    assert!(counters.get("widget.render").is_some());
}

#[test]
fn test_unknown_matcher_fails_resolution() {
    init_tracing();

    let yaml = r#"
monitors:
  "m":
    exceptions:
      - on: [does-not-exist]
"#;
    let manifest = MonitorManifest::parse(yaml).unwrap();

    let err = manifest.get("m").unwrap().resolve(&catalog()).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownMatcher(_)));
}

#[test]
fn test_undeclared_method_has_no_manifest_entry() {
    let manifest = MonitorManifest::parse(MANIFEST).unwrap();
    assert!(manifest.get("app.services.Widget::undeclared").is_none());
}
