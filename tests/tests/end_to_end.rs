mod common;

use anyhow::Result;
use common::model_schema;
use filterql::{compile, Entity, FilterError, ParseError, Value};
use serde_json::json;

#[test]
fn known_string_equality_filters_a_sequence() -> Result<()> {
    let schema = model_schema();
    let filter = compile("knownString eq 'test'", &schema)?;

    let entities = vec![
        Entity::new().with("knownString", "test"),
        Entity::new().with("knownString", "x"),
    ];
    let kept: Vec<_> = filter.filter(entities.into_iter()).collect();

    assert_eq!(kept, vec![Entity::new().with("knownString", "test")]);
    Ok(())
}

#[test]
fn any_with_membership_over_declared_complex_array() -> Result<()> {
    let schema = model_schema();
    let filter = compile("knownComplexTypeArray/any(x: x/fileName in ('test.txt', 'test2.txt'))", &schema)?;

    let entity = Entity::new().with(
        "knownComplexTypeArray",
        Value::array([Value::record([("fileName", Value::from("test.txt"))])]),
    );
    assert!(filter.matches(&entity));

    let other = Entity::new().with(
        "knownComplexTypeArray",
        Value::array([Value::record([("fileName", Value::from("unrelated.bin"))])]),
    );
    assert!(!filter.matches(&other));
    Ok(())
}

#[test]
fn dynamic_integer_matches_a_stored_string() -> Result<()> {
    let schema = model_schema();
    let filter = compile("unknownInt eq 123", &schema)?;

    assert!(filter.matches(&Entity::new().with_open("unknownInt", json!("123"))));
    assert!(filter.matches(&Entity::new().with_open("unknownInt", json!(123))));
    assert!(!filter.matches(&Entity::new().with_open("unknownInt", json!("124"))));
    Ok(())
}

#[test]
fn any_over_an_undeclared_collection_is_rejected_at_compile_time() {
    let schema = model_schema();
    let result = compile("unknownComplexTypeArray/any(x: x/fileName eq 'test.txt')", &schema);

    assert!(matches!(
        result,
        Err(FilterError::Parse(ParseError::UnsupportedConstruct { .. }))
    ));
}

#[test]
fn wrong_case_keyword_with_broken_quoting_fails_deterministically() {
    let schema = model_schema();
    let result = compile("unknownString IN ('a, 'b', 'c')", &schema);

    match result {
        Err(FilterError::Parse(_)) | Err(FilterError::Lex(_)) => {}
        other => panic!("expected a lex or parse error, got {:?}", other),
    }
}

#[test]
fn the_full_working_set_compiles_as_one_conjunction() -> Result<()> {
    let schema = model_schema();
    let working_query_parts = [
        "knownString eq 'test'",
        "knownComplexTypeArray/any(x: x/fileName in ('test.txt', 'test2.txt'))",
        "unknownString eq 'test'",
        "unknownInt eq 123",
        "unknownDateTime eq 2024-01-01T00:00:00Z",
        "knownString in ('a', 'b', 'c')",
        "knownInt in (1, 2, 3)",
    ];

    let filter = compile(&working_query_parts.join(" and "), &schema)?;

    // Applying to an empty sequence exercises the predicate without any
    // entity satisfying the contradictory conjunction.
    let kept: Vec<Entity> = filter.filter(Vec::new().into_iter()).collect();
    assert!(kept.is_empty());
    Ok(())
}

#[test]
fn compilation_is_extensionally_idempotent() -> Result<()> {
    let schema = model_schema();
    let input = "knownString eq 'test' and unknownInt eq 123";
    let first = compile(input, &schema)?;
    let second = compile(input, &schema)?;

    let entities = [
        Entity::new().with("knownString", "test").with_open("unknownInt", json!("123")),
        Entity::new().with("knownString", "test"),
        Entity::new(),
    ];
    for entity in &entities {
        assert_eq!(first.matches(entity), second.matches(entity));
    }
    Ok(())
}
