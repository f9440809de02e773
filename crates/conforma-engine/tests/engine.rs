//! End-to-end engine behavior.

use std::sync::Arc;
use std::thread;

use conforma_engine::{Engine, EngineError, MapObject, Rule, RuleId, Scalar, Variable};

fn rule(clause: &str, test: &str) -> Rule {
    Rule::new(RuleId::new(clause, 1), test)
}

#[test]
fn rule_test_reads_bound_properties() {
    let engine = Engine::initialise();
    let object = MapObject::new().with_property("a", 5).with_property("b", "x");

    assert!(engine.evaluate_rule_test(&object, &rule("c1", "a > 3")).unwrap());
    assert!(!engine.evaluate_rule_test(&object, &rule("c2", "a > 10")).unwrap());
}

#[test]
fn relationship_size_binds_cardinality() {
    let engine = Engine::initialise();
    let children = vec![MapObject::new(), MapObject::new(), MapObject::new()];
    let object = MapObject::new().with_relationship("children", children);

    assert!(engine
        .evaluate_rule_test(&object, &rule("c1", "children_size == 3"))
        .unwrap());
}

#[test]
fn same_rule_compiles_once_across_objects() {
    let engine = Engine::initialise();
    let shared = rule("c1", "a > 3");
    let first = MapObject::new().with_property("a", 5);
    let second = MapObject::new().with_property("a", 1);

    assert!(engine.evaluate_rule_test(&first, &shared).unwrap());
    assert!(!engine.evaluate_rule_test(&second, &shared).unwrap());
    assert_eq!(engine.compilations(), 1);
}

#[test]
fn undeclared_identifier_fails_at_execution() {
    let engine = Engine::initialise();
    let object = MapObject::new().with_property("a", 5);

    let err = engine
        .evaluate_rule_test(&object, &rule("c1", "missing > 3"))
        .unwrap_err();
    assert!(matches!(err, EngineError::UnresolvedBinding { name } if name == "missing"));
}

#[test]
fn non_boolean_rule_result_is_rejected() {
    let engine = Engine::initialise();
    let object = MapObject::new().with_property("b", "x");

    let err = engine.evaluate_rule_test(&object, &rule("c1", "b")).unwrap_err();
    assert!(matches!(err, EngineError::TypeCoercion { .. }));
}

#[test]
fn absent_property_compares_to_null() {
    let engine = Engine::initialise();
    let object = MapObject::new().with_property("a", Scalar::Absent);

    assert!(engine
        .evaluate_rule_test(&object, &rule("c1", "a == null"))
        .unwrap());
}

#[test]
fn variable_value_unwraps_to_plain_scalar() {
    let engine = Engine::initialise();
    let object = MapObject::new().with_property("a", 5);
    let variable = Variable::new("incremented", "a + 1");

    assert_eq!(
        engine.evaluate_variable(&object, &variable).unwrap(),
        Scalar::Int(6)
    );
}

#[test]
fn variables_cache_by_name() {
    let engine = Engine::initialise();
    let variable = Variable::new("doubled", "a * 2");

    let first = MapObject::new().with_property("a", 5);
    assert_eq!(
        engine.evaluate_variable(&first, &variable).unwrap(),
        Scalar::Int(10)
    );

    let second = MapObject::new().with_property("a", 7);
    assert_eq!(
        engine.evaluate_variable(&second, &variable).unwrap(),
        Scalar::Int(14)
    );

    assert_eq!(engine.compilations(), 1);
}

#[test]
fn rule_and_variable_caches_are_independent() {
    let engine = Engine::initialise();
    let object = MapObject::new().with_property("a", 5);

    // A rule and a variable may share the same textual name without
    // colliding.
    let shared = rule("a", "a > 0");
    let variable = Variable::new("a-1", "a");

    assert!(engine.evaluate_rule_test(&object, &shared).unwrap());
    assert_eq!(
        engine.evaluate_variable(&object, &variable).unwrap(),
        Scalar::Int(5)
    );
    assert_eq!(engine.compilations(), 2);
}

#[test]
fn failed_compilation_is_retried_not_cached() {
    let engine = Engine::initialise();
    let object = MapObject::new().with_property("a", 5);
    let broken = rule("c1", "a >");

    assert!(matches!(
        engine.evaluate_rule_test(&object, &broken).unwrap_err(),
        EngineError::Compile { .. }
    ));
    assert_eq!(engine.compilations(), 0);

    // A second attempt compiles again instead of reusing a failure marker.
    assert!(matches!(
        engine.evaluate_rule_test(&object, &broken).unwrap_err(),
        EngineError::Compile { .. }
    ));
    assert_eq!(engine.compilations(), 0);
}

#[test]
fn shutdown_releases_context_once() {
    let engine = Engine::initialise();
    let object = MapObject::new().with_property("a", 1);

    engine.shutdown().unwrap();
    assert!(matches!(
        engine
            .evaluate_rule_test(&object, &rule("c1", "a == 1"))
            .unwrap_err(),
        EngineError::ContextClosed
    ));
    assert!(matches!(engine.shutdown().unwrap_err(), EngineError::ContextClosed));
}

#[test]
fn raw_evaluation_sees_object_and_globals() {
    let engine = Engine::builder().global("threshold", 10).build();
    let object = MapObject::new().with_property("pages", 3);

    assert_eq!(
        engine
            .evaluate_raw(&object, "obj.getpages() + threshold")
            .unwrap(),
        Scalar::Int(13)
    );
}

#[test]
fn raw_evaluation_is_not_cached() {
    let engine = Engine::initialise();
    let object = MapObject::new().with_property("a", 1);

    assert_eq!(engine.evaluate_raw(&object, "1 + 1").unwrap(), Scalar::Int(2));
    assert_eq!(engine.compilations(), 0);
}

#[test]
fn concurrent_evaluations_match_sequential_results() {
    let engine = Arc::new(Engine::initialise());

    let mut handles = Vec::new();
    for i in 0..8i64 {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            let object = MapObject::new().with_property("a", i);
            let test = Rule::new(RuleId::new("par", i as u32), format!("a == {i}"));
            let variable = Variable::new(format!("v{i}"), "a + 1");

            let matched = engine.evaluate_rule_test(&object, &test).unwrap();
            let value = engine.evaluate_variable(&object, &variable).unwrap();
            (matched, value)
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let (matched, value) = handle.join().unwrap();
        assert!(matched, "rule for object {i} saw another object's binding");
        assert_eq!(value, Scalar::Int(i as i64 + 1));
    }
}
