//! Scrape-level behaviour of gauge func vectors registered in a Prometheus registry

use gauge_func_vec::{export_metrics, GaugeFuncVec, RegisterError};
use prometheus::{Opts, Registry};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

fn registry_with(vec: &GaugeFuncVec) -> Registry {
    let registry = Registry::new();
    registry.register(Box::new(vec.clone())).unwrap();
    registry
}

fn lines(text: &[&str]) -> String {
    text.iter().map(|l| format!("{l}\n")).collect()
}

#[test]
fn test_with_const_labels() {
    let vec = GaugeFuncVec::new(
        Opts::new("with_const_labels", "A vector of gauge funcs with const labels")
            .namespace("gaugefuncvec")
            .subsystem("test")
            .const_label("const", "label"),
        &["number"],
    )
    .unwrap();
    vec.must_register(&HashMap::from([("number", "one")]), || 1.0);
    vec.must_register(&HashMap::from([("number", "two")]), || 2.0);

    let registry = registry_with(&vec);

    assert_eq!(
        export_metrics(&registry).unwrap(),
        lines(&[
            "# HELP gaugefuncvec_test_with_const_labels A vector of gauge funcs with const labels",
            "# TYPE gaugefuncvec_test_with_const_labels gauge",
            r#"gaugefuncvec_test_with_const_labels{const="label",number="one"} 1"#,
            r#"gaugefuncvec_test_with_const_labels{const="label",number="two"} 2"#,
        ])
    );
}

#[test]
fn test_without_const_labels() {
    let vec = GaugeFuncVec::new(
        Opts::new("with_const_labels", "A vector of gauge funcs")
            .namespace("gaugefuncvec")
            .subsystem("test"),
        &["number"],
    )
    .unwrap();
    vec.must_register(&HashMap::from([("number", "twenty")]), || 20.0);
    vec.must_register(&HashMap::from([("number", "ten")]), || 10.0);

    let registry = registry_with(&vec);

    assert_eq!(
        export_metrics(&registry).unwrap(),
        lines(&[
            "# HELP gaugefuncvec_test_with_const_labels A vector of gauge funcs",
            "# TYPE gaugefuncvec_test_with_const_labels gauge",
            r#"gaugefuncvec_test_with_const_labels{number="ten"} 10"#,
            r#"gaugefuncvec_test_with_const_labels{number="twenty"} 20"#,
        ])
    );
}

#[test]
fn test_without_any_labels() {
    let vec = GaugeFuncVec::new(
        Opts::new("without_labels", "A single gauge without labels")
            .namespace("gaugefuncvec")
            .subsystem("test"),
        &[],
    )
    .unwrap();
    vec.must_register(&HashMap::new(), || 288.0);

    let registry = registry_with(&vec);

    assert_eq!(
        export_metrics(&registry).unwrap(),
        lines(&[
            "# HELP gaugefuncvec_test_without_labels A single gauge without labels",
            "# TYPE gaugefuncvec_test_without_labels gauge",
            "gaugefuncvec_test_without_labels 288",
        ])
    );
}

#[test]
fn test_function_is_called_on_every_gather() {
    let value = Arc::new(AtomicU64::new(100));
    let source = value.clone();

    let vec = GaugeFuncVec::new(
        Opts::new("with_changing_value", "A vector of gauge funcs")
            .namespace("gaugefuncvec")
            .subsystem("test"),
        &["number"],
    )
    .unwrap();
    vec.must_register(&HashMap::from([("number", "changing")]), move || {
        (source.fetch_add(1, Ordering::SeqCst) + 1) as f64
    });

    let registry = registry_with(&vec);
    let expected = |v: u64| {
        let sample = format!(r#"gaugefuncvec_test_with_changing_value{{number="changing"}} {v}"#);
        lines(&[
            "# HELP gaugefuncvec_test_with_changing_value A vector of gauge funcs",
            "# TYPE gaugefuncvec_test_with_changing_value gauge",
            sample.as_str(),
        ])
    };

    assert_eq!(export_metrics(&registry).unwrap(), expected(101));
    assert_eq!(export_metrics(&registry).unwrap(), expected(102));
    assert_eq!(value.load(Ordering::SeqCst), 102);
}

#[test]
fn test_registration_after_registry_registration_is_scraped() {
    let vec = GaugeFuncVec::new(Opts::new("late", "Late registrations"), &["number"]).unwrap();
    let registry = registry_with(&vec);

    // nothing registered yet: the empty family is pruned by the registry
    assert_eq!(export_metrics(&registry).unwrap(), "");

    vec.must_register(&HashMap::from([("number", "one")]), || 1.0);
    assert!(export_metrics(&registry)
        .unwrap()
        .contains(r#"late{number="one"} 1"#));
}

#[test]
fn test_duplicate_registration_keeps_first_function() {
    let vec = GaugeFuncVec::new(
        Opts::new("with_same_labels", "A vector of gauge funcs with same labels")
            .namespace("gaugefuncvec")
            .subsystem("test"),
        &["number"],
    )
    .unwrap();
    vec.must_register(&HashMap::from([("number", "same")]), || 10.0);

    let err = vec
        .register(&HashMap::from([("number", "same")]), || 20.0)
        .unwrap_err();
    assert_eq!(
        err,
        RegisterError::Duplicate {
            key: r#"{number="same"}"#.to_string()
        }
    );

    let registry = registry_with(&vec);
    assert!(export_metrics(&registry)
        .unwrap()
        .contains(r#"gaugefuncvec_test_with_same_labels{number="same"} 10"#));
}

#[test]
fn test_const_label_override_is_rejected() {
    let vec = GaugeFuncVec::new(
        Opts::new("with_same_labels", "A vector of gauge funcs with same labels")
            .const_label("label", "any"),
        &["number"],
    )
    .unwrap();

    let err = vec
        .register(&HashMap::from([("label", "again")]), || 20.0)
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        r#"can't override const label label, const labels are {label="any"}"#
    );
    assert!(vec.is_empty());
}

#[test]
fn test_two_vectors_in_one_registry() {
    let connections = GaugeFuncVec::new(
        Opts::new("connections", "Open connections").namespace("database"),
        &["connection_id"],
    )
    .unwrap();
    let idle = GaugeFuncVec::new(
        Opts::new("idle_connections", "Idle connections").namespace("database"),
        &["connection_id"],
    )
    .unwrap();
    connections.must_register(&HashMap::from([("connection_id", "master")]), || 42.0);
    idle.must_register(&HashMap::from([("connection_id", "master")]), || 3.0);

    let registry = Registry::new();
    registry.register(Box::new(connections)).unwrap();
    registry.register(Box::new(idle)).unwrap();

    let families = registry.gather();
    let names: Vec<&str> = families.iter().map(|f| f.get_name()).collect();
    assert_eq!(names, vec!["database_connections", "database_idle_connections"]);
}

#[test]
fn test_same_vector_cannot_be_registered_twice() {
    let vec = GaugeFuncVec::new(Opts::new("twice", "Registered twice"), &[]).unwrap();
    let registry = registry_with(&vec);

    assert!(registry.register(Box::new(vec.clone())).is_err());
}
