use std::fmt;
use std::sync::Arc;

/// Declared type of a schema property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyType {
    String,
    Integer,
    DateTime,
    Bool,
    Complex(Arc<Schema>),
    Array(Box<PropertyType>),
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyType::String => write!(f, "string"),
            PropertyType::Integer => write!(f, "integer"),
            PropertyType::DateTime => write!(f, "datetime"),
            PropertyType::Bool => write!(f, "boolean"),
            PropertyType::Complex(_) => write!(f, "complex"),
            PropertyType::Array(element) => write!(f, "array of {}", element),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub name: String,
    pub ty: PropertyType,
    pub nullable: bool,
}

/// The declared properties of one entity type. Built once, then shared
/// read-only by every compilation; identifiers with no declaration here
/// resolve dynamically against the entity's open bag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    properties: Vec<PropertyDecl>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder { SchemaBuilder::default() }

    pub fn property(&self, name: &str) -> Option<&PropertyDecl> { self.properties.iter().find(|p| p.name == name) }

    pub fn properties(&self) -> &[PropertyDecl] { &self.properties }

    /// Walk a path through nested declarations, segment by segment.
    /// `None` as soon as a segment has no declaration or the walk tries to
    /// step into a non-complex type; the caller treats that as a dynamic
    /// reference.
    pub fn declared_type(&self, segments: &[String]) -> Option<PropertyType> {
        let (first, rest) = segments.split_first()?;
        let decl = self.property(first)?;
        if rest.is_empty() {
            return Some(decl.ty.clone());
        }
        match &decl.ty {
            PropertyType::Complex(nested) => nested.declared_type(rest),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct SchemaBuilder {
    properties: Vec<PropertyDecl>,
}

impl SchemaBuilder {
    pub fn property(mut self, name: impl Into<String>, ty: PropertyType) -> Self {
        self.properties.push(PropertyDecl { name: name.into(), ty, nullable: false });
        self
    }

    pub fn nullable(mut self, name: impl Into<String>, ty: PropertyType) -> Self {
        self.properties.push(PropertyDecl { name: name.into(), ty, nullable: true });
        self
    }

    pub fn build(self) -> Schema { Schema { properties: self.properties } }
}
