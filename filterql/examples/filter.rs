use filterql::{compile, Entity, PropertyType, Schema, Value};
use serde_json::json;
use std::sync::Arc;

fn main() {
    let attachment = Arc::new(Schema::builder().property("fileName", PropertyType::String).build());
    let schema = Schema::builder()
        .property("knownString", PropertyType::String)
        .property("knownInt", PropertyType::Integer)
        .property("knownComplexTypeArray", PropertyType::Array(Box::new(PropertyType::Complex(attachment))))
        .build();

    let entities = vec![
        Entity::new()
            .with("knownString", "test")
            .with("knownInt", 1)
            .with("knownComplexTypeArray", Value::array([Value::record([("fileName", Value::from("test.txt"))])])),
        Entity::new().with("knownString", "other").with("knownInt", 2).with_open("unknownInt", json!("123")),
    ];

    let queries = [
        "knownString eq 'test'",
        "knownComplexTypeArray/any(x: x/fileName in ('test.txt', 'test2.txt'))",
        "unknownInt eq 123",
        "knownInt in (1, 2, 3)",
    ];

    for query in queries {
        let filter = compile(query, &schema).expect("query is in the supported subset");
        let matched = filter.filter(entities.iter().cloned()).count();
        println!("{query} -> {matched} of {} entities", entities.len());
    }

    // Errors are typed and carry the offending position.
    match compile("unknownString IN ('a, 'b', 'c')", &schema) {
        Err(error) => println!("rejected: {error}"),
        Ok(_) => unreachable!(),
    }
}
