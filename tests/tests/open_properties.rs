mod common;

use anyhow::Result;
use chrono::{TimeZone, Utc};
use common::model_schema;
use filterql::{compile, Entity, Value};
use serde_json::json;

#[test]
fn absent_keys_evaluate_to_false_never_to_an_error() -> Result<()> {
    let schema = model_schema();
    let empty = Entity::new();

    assert!(!compile("unknownString eq 'x'", &schema)?.matches(&empty));
    assert!(!compile("unknownInt in (1, 2)", &schema)?.matches(&empty));
    assert!(!compile("knownComplexTypeArray/any(x: x/fileName eq 'a')", &schema)?.matches(&empty));
    Ok(())
}

#[test]
fn dynamic_values_compare_by_shape() -> Result<()> {
    let schema = model_schema();

    let entity = Entity::new()
        .with_open("unknownString", json!("test"))
        .with_open("unknownInt", json!("123"))
        .with_open("unknownDateTime", json!("2024-01-01T00:00:00Z"));

    assert!(compile("unknownString eq 'test'", &schema)?.matches(&entity));
    assert!(compile("unknownInt eq 123", &schema)?.matches(&entity));
    assert!(compile("unknownDateTime eq 2024-01-01T00:00:00Z", &schema)?.matches(&entity));

    // A stored value that fits none of the literal's coercions is false.
    let odd = Entity::new().with_open("unknownInt", json!([1, 2, 3]));
    assert!(!compile("unknownInt eq 123", &schema)?.matches(&odd));
    Ok(())
}

#[test]
fn dynamic_membership_is_best_effort() -> Result<()> {
    let schema = model_schema();
    let filter = compile("unknownInt in (1, 2, 3)", &schema)?;

    assert!(filter.matches(&Entity::new().with_open("unknownInt", json!(2))));
    assert!(filter.matches(&Entity::new().with_open("unknownInt", json!("2"))));
    assert!(!filter.matches(&Entity::new().with_open("unknownInt", json!(4))));
    assert!(!filter.matches(&Entity::new().with_open("unknownInt", json!(true))));
    Ok(())
}

#[test]
fn dynamic_paths_walk_nested_bag_values() -> Result<()> {
    let schema = model_schema();
    let filter = compile("metadata/owner/name eq 'alice'", &schema)?;

    let entity = Entity::new().with_open("metadata", json!({ "owner": { "name": "alice" } }));
    assert!(filter.matches(&entity));

    let wrong_shape = Entity::new().with_open("metadata", json!({ "owner": "alice" }));
    assert!(!filter.matches(&wrong_shape));
    Ok(())
}

#[test]
fn declared_names_are_never_satisfied_by_the_bag() -> Result<()> {
    let schema = model_schema();
    let filter = compile("knownString eq 'test'", &schema)?;

    // `knownString` is declared, so a bag entry under the same name does
    // not count; only the typed field can satisfy the comparison.
    let shadowed = Entity::new().with_open("knownString", json!("test"));
    assert!(!filter.matches(&shadowed));
    Ok(())
}

#[test]
fn declared_datetime_fields_compare_as_datetimes() -> Result<()> {
    let schema = model_schema();
    let filter = compile("knownDateTime eq 2024-01-01T00:00:00Z", &schema)?;

    let moment = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert!(filter.matches(&Entity::new().with("knownDateTime", Value::DateTime(moment))));

    let later = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 1).unwrap();
    assert!(!filter.matches(&Entity::new().with("knownDateTime", Value::DateTime(later))));
    Ok(())
}

#[test]
fn runtime_shape_mismatches_degrade_to_false() -> Result<()> {
    let schema = model_schema();

    // Declared integer field holding a string at runtime: no match, no panic.
    let filter = compile("knownInt eq 1", &schema)?;
    assert!(!filter.matches(&Entity::new().with("knownInt", "1")));

    // Declared array field holding a scalar: any() is simply false.
    let any_filter = compile("knownComplexTypeArray/any(x: x/fileName eq 'a')", &schema)?;
    assert!(!any_filter.matches(&Entity::new().with("knownComplexTypeArray", "not an array")));
    Ok(())
}
