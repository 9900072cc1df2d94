//! Filter expressions over partially-open entities.
//!
//! A filter string in the style of OData `$filter` is compiled against a
//! declared [`Schema`]: identifiers with a declaration are checked and typed
//! up front, every other identifier resolves at evaluation time against the
//! entity's open property bag. Compilation fails loudly with one of four
//! error kinds; the compiled predicate itself never fails: an absent key or
//! a shape mismatch at evaluation time is simply `false`.
//!
//! ```
//! use filterql::{compile, Entity, PropertyType, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::builder().property("knownString", PropertyType::String).build();
//! let filter = compile("knownString eq 'test' and unknownInt eq 123", &schema).unwrap();
//!
//! let entity = Entity::new().with("knownString", "test").with_open("unknownInt", json!("123"));
//! assert!(filter.matches(&entity));
//! ```

pub mod ast;
pub mod bind;
pub mod coerce;
mod conversion;
pub mod entity;
pub mod error;
pub mod grammar;
pub mod parser;
pub mod schema;
pub mod selection;
pub mod value;

pub use bind::{bind, BoundPath, BoundPredicate, Resolution};
pub use coerce::LiteralValue;
pub use entity::{Entity, Lookup, Record};
pub use error::{FilterError, LexError, LiteralError, ParseError, TypeMismatchError};
pub use parser::{parse_filter, parse_filter_with, ParseOptions};
pub use schema::{PropertyDecl, PropertyType, Schema};
pub use selection::filter::{CompiledFilter, FilterIterator};
pub use value::Value;

/// Compile a filter string against a schema with the default limits.
pub fn compile(input: &str, schema: &Schema) -> Result<CompiledFilter, FilterError> {
    compile_with(input, schema, &ParseOptions::default())
}

pub fn compile_with(input: &str, schema: &Schema, options: &ParseOptions) -> Result<CompiledFilter, FilterError> {
    let parsed = parser::parse_filter_with(input, options)?;
    let bound = bind::bind(&parsed, schema)?;
    tracing::debug!(filter = input, "compiled filter expression");
    Ok(CompiledFilter::new(bound))
}
