use crate::ast::{Literal, LiteralKind};
use crate::error::{FilterError, LiteralError};
use chrono::{DateTime, NaiveDateTime, Utc};

/// Datetime literals are UTC-only ISO-8601 with a literal trailing `Z`;
/// fractional seconds are accepted.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// A literal after coercion. Scalars come from `eq` comparisons, sets from
/// `in` lists; sets are homogeneous by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Integer(i64),
    DateTime(DateTime<Utc>),
    StringSet(Vec<String>),
    IntegerSet(Vec<i64>),
}

impl LiteralValue {
    pub fn kind(&self) -> LiteralKind {
        match self {
            LiteralValue::String(_) | LiteralValue::StringSet(_) => LiteralKind::String,
            LiteralValue::Integer(_) | LiteralValue::IntegerSet(_) => LiteralKind::Integer,
            LiteralValue::DateTime(_) => LiteralKind::DateTime,
        }
    }
}

pub(crate) fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text, DATETIME_FORMAT).ok().map(|naive| naive.and_utc())
}

/// Convert a scalar literal by its syntactic shape. The grammar fixes the
/// shape, so the only failures left are semantic: an out-of-range integer
/// or a datetime with impossible components.
pub fn coerce(literal: &Literal) -> Result<LiteralValue, FilterError> {
    match literal.kind {
        LiteralKind::String => Ok(LiteralValue::String(literal.text.clone())),
        LiteralKind::Integer => literal
            .text
            .parse::<i64>()
            .map(LiteralValue::Integer)
            .map_err(|_| LiteralError::IntegerOutOfRange { raw: literal.text.clone(), offset: literal.offset }.into()),
        LiteralKind::DateTime => parse_datetime(&literal.text)
            .map(LiteralValue::DateTime)
            .ok_or_else(|| LiteralError::InvalidDateTime { raw: literal.text.clone(), offset: literal.offset }.into()),
    }
}

/// Convert an `in` list into a homogeneous set of strings or integers.
pub fn coerce_set(items: &[Literal]) -> Result<LiteralValue, FilterError> {
    let first = match items.first() {
        Some(first) => first,
        None => return Ok(LiteralValue::StringSet(Vec::new())),
    };

    if let Some(datetime) = items.iter().find(|item| item.kind == LiteralKind::DateTime) {
        return Err(LiteralError::UnsupportedSetElement { offset: datetime.offset }.into());
    }
    if let Some(mixed) = items.iter().find(|item| item.kind != first.kind) {
        return Err(LiteralError::MixedSet { offset: mixed.offset }.into());
    }

    match first.kind {
        LiteralKind::String => Ok(LiteralValue::StringSet(items.iter().map(|item| item.text.clone()).collect())),
        LiteralKind::Integer => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                let value = item
                    .text
                    .parse::<i64>()
                    .map_err(|_| LiteralError::IntegerOutOfRange { raw: item.text.clone(), offset: item.offset })?;
                values.push(value);
            }
            Ok(LiteralValue::IntegerSet(values))
        }
        LiteralKind::DateTime => unreachable!("datetime elements rejected above"),
    }
}
