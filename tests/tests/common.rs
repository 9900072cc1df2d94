use filterql::{PropertyType, Schema};
use std::sync::Arc;

/// Schema of the model used across the integration tests: a handful of
/// declared properties and, implicitly, an open bag for everything else.
pub fn model_schema() -> Schema {
    let file = Arc::new(Schema::builder().property("fileName", PropertyType::String).build());
    Schema::builder()
        .property("id", PropertyType::Integer)
        .property("knownString", PropertyType::String)
        .property("knownInt", PropertyType::Integer)
        .property("knownDateTime", PropertyType::DateTime)
        .property("knownComplexTypeArray", PropertyType::Array(Box::new(PropertyType::Complex(file))))
        .build()
}
