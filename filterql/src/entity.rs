use crate::value::Value;
use std::collections::BTreeMap;

/// Result of the uniform property lookup across both halves of a record.
#[derive(Debug, PartialEq)]
pub enum Lookup<'a> {
    Declared(&'a Value),
    Open(&'a serde_json::Value),
    Missing,
}

/// The seam between the engine and whatever actually stores entities.
/// A record has a fixed, typed part for declared properties and an open,
/// untyped bag for everything else. Declared names must never be shadowed
/// by the bag: `declared` wins unconditionally in `lookup`.
pub trait Record {
    fn declared(&self, name: &str) -> Option<&Value>;
    fn open(&self, name: &str) -> Option<&serde_json::Value>;

    fn lookup(&self, name: &str) -> Lookup<'_> {
        if let Some(value) = self.declared(name) {
            Lookup::Declared(value)
        } else if let Some(value) = self.open(name) {
            Lookup::Open(value)
        } else {
            Lookup::Missing
        }
    }
}

/// The canonical in-memory record: typed fields plus an open bag of
/// arbitrary JSON values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    declared: BTreeMap<String, Value>,
    open: BTreeMap<String, serde_json::Value>,
}

impl Entity {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.declared.insert(name.into(), value.into());
        self
    }

    pub fn with_open(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.open.insert(name.into(), value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) { self.declared.insert(name.into(), value.into()); }

    pub fn set_open(&mut self, name: impl Into<String>, value: serde_json::Value) { self.open.insert(name.into(), value); }
}

impl Record for Entity {
    fn declared(&self, name: &str) -> Option<&Value> { self.declared.get(name) }

    fn open(&self, name: &str) -> Option<&serde_json::Value> { self.open.get(name) }
}
