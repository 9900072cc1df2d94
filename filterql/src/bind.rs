//! Schema binding: classify every path in a parsed predicate as a Static
//! reference (declared, typed, checked now) or a Dynamic one (resolved
//! against the open bag at evaluation time), and coerce literals. Binding a
//! plain identifier never fails; only Static literal incompatibilities and
//! collection misuse are errors, and all of them surface here rather than
//! during evaluation.

use crate::ast::{LiteralKind, PathExpr, Predicate};
use crate::coerce::{self, LiteralValue};
use crate::error::{FilterError, ParseError, TypeMismatchError};
use crate::schema::{PropertyType, Schema};

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Static(PropertyType),
    Dynamic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundPath {
    pub segments: Vec<String>,
    pub resolution: Resolution,
}

/// A predicate with every path resolved and every literal coerced. Inside
/// `Any`, the body path is relative to the collection element: the range
/// variable is gone.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundPredicate {
    Comparison { path: BoundPath, value: LiteralValue },
    In { path: BoundPath, set: LiteralValue },
    Any { path: BoundPath, body: Box<BoundPredicate> },
    And(Box<BoundPredicate>, Box<BoundPredicate>),
    Or(Box<BoundPredicate>, Box<BoundPredicate>),
}

pub fn bind(predicate: &Predicate, schema: &Schema) -> Result<BoundPredicate, FilterError> {
    match predicate {
        Predicate::Comparison { path, literal } => {
            let resolution = resolve(schema, &path.segments);
            if let Resolution::Static(ty) = &resolution {
                check_literal(&path.name(), ty, literal.kind)?;
            }
            let value = coerce::coerce(literal)?;
            Ok(BoundPredicate::Comparison { path: BoundPath { segments: path.segments.clone(), resolution }, value })
        }
        Predicate::In { path, items } => {
            let resolution = resolve(schema, &path.segments);
            let set = coerce::coerce_set(items)?;
            if let Resolution::Static(ty) = &resolution {
                check_set(&path.name(), ty, &set)?;
            }
            Ok(BoundPredicate::In { path: BoundPath { segments: path.segments.clone(), resolution }, set })
        }
        Predicate::Any { path, body, .. } => bind_any(path, body, schema),
        Predicate::And(left, right) => {
            Ok(BoundPredicate::And(Box::new(bind(left, schema)?), Box::new(bind(right, schema)?)))
        }
        Predicate::Or(left, right) => {
            Ok(BoundPredicate::Or(Box::new(bind(left, schema)?), Box::new(bind(right, schema)?)))
        }
    }
}

/// A path with no declaration (or one that walks past a declared prefix the
/// schema cannot navigate) is Dynamic. Declared names shadow the open bag,
/// so a Dynamic binding whose head is declared simply never matches; the
/// bag is not allowed to satisfy it.
fn resolve(schema: &Schema, segments: &[String]) -> Resolution {
    schema.declared_type(segments).map(Resolution::Static).unwrap_or(Resolution::Dynamic)
}

fn check_literal(property: &str, expected: &PropertyType, found: LiteralKind) -> Result<(), TypeMismatchError> {
    let compatible = matches!(
        (expected, found),
        (PropertyType::String, LiteralKind::String)
            | (PropertyType::Integer, LiteralKind::Integer)
            | (PropertyType::DateTime, LiteralKind::DateTime)
    );
    if compatible {
        Ok(())
    } else {
        Err(TypeMismatchError::IncompatibleLiteral { property: property.to_string(), expected: expected.clone(), found })
    }
}

fn check_set(property: &str, expected: &PropertyType, set: &LiteralValue) -> Result<(), TypeMismatchError> {
    let compatible = matches!(
        (expected, set),
        (PropertyType::String, LiteralValue::StringSet(_)) | (PropertyType::Integer, LiteralValue::IntegerSet(_))
    );
    if compatible {
        Ok(())
    } else {
        Err(TypeMismatchError::IncompatibleSet { property: property.to_string(), expected: expected.clone(), found: set.kind() })
    }
}

fn bind_any(path: &PathExpr, body: &Predicate, schema: &Schema) -> Result<BoundPredicate, FilterError> {
    match schema.declared_type(&path.segments) {
        // The quantifier needs an element type to bind its variable against;
        // an open-bag collection has none.
        None => Err(ParseError::UnsupportedConstruct {
            construct: "any over an undeclared collection".to_string(),
            offset: path.offset,
        }
        .into()),
        Some(PropertyType::Array(element)) => {
            let body = bind_element_body(path, &element, body)?;
            let resolution = Resolution::Static(PropertyType::Array(element));
            Ok(BoundPredicate::Any {
                path: BoundPath { segments: path.segments.clone(), resolution },
                body: Box::new(body),
            })
        }
        Some(_) => Err(TypeMismatchError::NotACollection { property: path.name() }.into()),
    }
}

fn bind_element_body(collection: &PathExpr, element: &PropertyType, body: &Predicate) -> Result<BoundPredicate, FilterError> {
    match body {
        Predicate::Comparison { path, literal } => {
            let relative: Vec<String> = path.segments[1..].to_vec();
            let resolution = element_resolution(collection, element, &relative)?;
            if let Resolution::Static(ty) = &resolution {
                check_literal(&element_name(collection, &relative), ty, literal.kind)?;
            }
            let value = coerce::coerce(literal)?;
            Ok(BoundPredicate::Comparison { path: BoundPath { segments: relative, resolution }, value })
        }
        Predicate::In { path, items } => {
            let relative: Vec<String> = path.segments[1..].to_vec();
            let resolution = element_resolution(collection, element, &relative)?;
            let set = coerce::coerce_set(items)?;
            if let Resolution::Static(ty) = &resolution {
                check_set(&element_name(collection, &relative), ty, &set)?;
            }
            Ok(BoundPredicate::In { path: BoundPath { segments: relative, resolution }, set })
        }
        // The parser only lets a single comparison or membership through.
        _ => Err(ParseError::UnsupportedConstruct { construct: "compound lambda body".to_string(), offset: collection.offset }.into()),
    }
}

fn element_resolution(collection: &PathExpr, element: &PropertyType, relative: &[String]) -> Result<Resolution, FilterError> {
    if relative.is_empty() {
        // Bare range variable: the comparison targets the element itself.
        return Ok(Resolution::Static(element.clone()));
    }
    match element {
        PropertyType::Complex(nested) => Ok(nested.declared_type(relative).map(Resolution::Static).unwrap_or(Resolution::Dynamic)),
        _ => Err(TypeMismatchError::PrimitiveElementField { property: collection.name(), segment: relative[0].clone() }.into()),
    }
}

fn element_name(collection: &PathExpr, relative: &[String]) -> String {
    if relative.is_empty() {
        collection.name()
    } else {
        format!("{}/{}", collection.name(), relative.join("/"))
    }
}
