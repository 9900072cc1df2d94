//! Filter records based on a bound predicate. Evaluation is best-effort by
//! contract: a missing key, a runtime shape mismatch or an uncoercible open
//! value makes the clause false, it never makes the evaluation fail.

use crate::bind::{BoundPredicate, Resolution};
use crate::coerce::{self, LiteralValue};
use crate::entity::Record;
use crate::value::Value;

/// The evaluable unit produced from a bound filter expression. Stateless
/// and immutable: one compiled filter may be applied to many sequences,
/// from many threads, without synchronization.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    predicate: BoundPredicate,
}

impl CompiledFilter {
    pub fn new(predicate: BoundPredicate) -> Self { Self { predicate } }

    pub fn predicate(&self) -> &BoundPredicate { &self.predicate }

    pub fn matches<R: Record>(&self, record: &R) -> bool { evaluate_predicate(record, &self.predicate) }

    /// Lazily filter a sequence, preserving its order.
    pub fn filter<I>(&self, iter: I) -> FilterIterator<'_, I> { FilterIterator { iter, predicate: &self.predicate } }
}

pub fn evaluate_predicate<R: Record + ?Sized>(record: &R, predicate: &BoundPredicate) -> bool {
    match predicate {
        BoundPredicate::Comparison { path, value } => match &path.resolution {
            Resolution::Static(_) => {
                static_lookup(record, &path.segments).map_or(false, |field| value_equals(field, value))
            }
            Resolution::Dynamic => {
                dynamic_lookup(record, &path.segments).map_or(false, |stored| json_equals(stored, value))
            }
        },
        BoundPredicate::In { path, set } => match &path.resolution {
            Resolution::Static(_) => static_lookup(record, &path.segments).map_or(false, |field| value_in(field, set)),
            Resolution::Dynamic => dynamic_lookup(record, &path.segments).map_or(false, |stored| json_in(stored, set)),
        },
        BoundPredicate::Any { path, body } => match static_lookup(record, &path.segments) {
            Some(Value::Array(items)) => items.iter().any(|element| evaluate_element(element, body)),
            _ => false,
        },
        BoundPredicate::And(left, right) => evaluate_predicate(record, left) && evaluate_predicate(record, right),
        BoundPredicate::Or(left, right) => evaluate_predicate(record, left) || evaluate_predicate(record, right),
    }
}

/// Evaluate a lambda body against one collection element. An empty body
/// path is the bare range variable, i.e. the element itself.
fn evaluate_element(element: &Value, body: &BoundPredicate) -> bool {
    match body {
        BoundPredicate::Comparison { path, value } => {
            element.at_path(&path.segments).map_or(false, |field| value_equals(field, value))
        }
        BoundPredicate::In { path, set } => element.at_path(&path.segments).map_or(false, |field| value_in(field, set)),
        _ => false,
    }
}

fn static_lookup<'a, R: Record + ?Sized>(record: &'a R, segments: &[String]) -> Option<&'a Value> {
    let (first, rest) = segments.split_first()?;
    record.declared(first)?.at_path(rest)
}

fn dynamic_lookup<'a, R: Record + ?Sized>(record: &'a R, segments: &[String]) -> Option<&'a serde_json::Value> {
    let (first, rest) = segments.split_first()?;
    let mut current = record.open(first)?;
    for segment in rest {
        current = current.get(segment.as_str())?;
    }
    Some(current)
}

fn value_equals(field: &Value, literal: &LiteralValue) -> bool {
    match (field, literal) {
        (Value::String(a), LiteralValue::String(b)) => a == b,
        (Value::Integer(a), LiteralValue::Integer(b)) => a == b,
        (Value::DateTime(a), LiteralValue::DateTime(b)) => a == b,
        _ => false,
    }
}

fn value_in(field: &Value, set: &LiteralValue) -> bool {
    match (field, set) {
        (Value::String(a), LiteralValue::StringSet(items)) => items.iter().any(|item| item == a),
        (Value::Integer(a), LiteralValue::IntegerSet(items)) => items.contains(a),
        _ => false,
    }
}

/// Best-effort comparison between an open-bag value and a coerced literal.
/// An integer literal also matches a stored string that parses as the same
/// integer; a datetime literal matches a stored string in the literal
/// format. Anything else is false.
fn json_equals(stored: &serde_json::Value, literal: &LiteralValue) -> bool {
    match literal {
        LiteralValue::String(expected) => stored.as_str() == Some(expected.as_str()),
        LiteralValue::Integer(expected) => match stored {
            serde_json::Value::Number(number) => number.as_i64() == Some(*expected),
            serde_json::Value::String(text) => text.parse::<i64>().ok() == Some(*expected),
            _ => false,
        },
        LiteralValue::DateTime(expected) => {
            stored.as_str().and_then(coerce::parse_datetime).map_or(false, |stored| stored == *expected)
        }
        LiteralValue::StringSet(_) | LiteralValue::IntegerSet(_) => false,
    }
}

fn json_in(stored: &serde_json::Value, set: &LiteralValue) -> bool {
    match set {
        LiteralValue::StringSet(items) => stored.as_str().map_or(false, |text| items.iter().any(|item| item == text)),
        LiteralValue::IntegerSet(items) => match stored {
            serde_json::Value::Number(number) => number.as_i64().map_or(false, |value| items.contains(&value)),
            serde_json::Value::String(text) => text.parse::<i64>().map_or(false, |value| items.contains(&value)),
            _ => false,
        },
        _ => false,
    }
}

pub struct FilterIterator<'p, I> {
    iter: I,
    predicate: &'p BoundPredicate,
}

impl<'p, I, R> Iterator for FilterIterator<'p, I>
where
    I: Iterator<Item = R>,
    R: Record,
{
    type Item = R;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = self.iter.next()?;
            if evaluate_predicate(&record, self.predicate) {
                return Some(record);
            }
        }
    }
}
