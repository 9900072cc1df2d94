use crate::ast::LiteralKind;
use crate::schema::PropertyType;
use thiserror::Error;

/// Any of the four compilation error kinds. Every failure happens during
/// compilation (lex, parse, bind, coerce); evaluation never errors.
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    TypeMismatch(#[from] TypeMismatchError),
    #[error(transparent)]
    Literal(#[from] LiteralError),
}

impl FilterError {
    /// Byte offset of the offending token, where the error carries one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            FilterError::Lex(LexError { offset, .. }) => Some(*offset),
            FilterError::Parse(ParseError::Syntax { offset, .. })
            | FilterError::Parse(ParseError::UnsupportedConstruct { offset, .. }) => Some(*offset),
            FilterError::Literal(LiteralError::InvalidDateTime { offset, .. })
            | FilterError::Literal(LiteralError::IntegerOutOfRange { offset, .. })
            | FilterError::Literal(LiteralError::MixedSet { offset })
            | FilterError::Literal(LiteralError::UnsupportedSetElement { offset }) => Some(*offset),
            _ => None,
        }
    }
}

/// A character the filter language has no token for.
#[derive(Debug, Error, PartialEq)]
#[error("unrecognized character {unexpected:?} at offset {offset}")]
pub struct LexError {
    pub offset: usize,
    pub unexpected: char,
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("syntax error at offset {offset}, expected one of {expected:?}")]
    Syntax { offset: usize, expected: Vec<String> },
    #[error("unsupported construct `{construct}` at offset {offset}")]
    UnsupportedConstruct { construct: String, offset: usize },
    #[error("expression nesting exceeds the configured maximum of {max_depth}")]
    TooDeep { max_depth: usize },
    #[error("empty filter expression")]
    Empty,
}

/// A declared property compared against a literal its type cannot accept.
/// Raised while binding, before any entity is evaluated.
#[derive(Debug, Error, PartialEq)]
pub enum TypeMismatchError {
    #[error("property `{property}` is declared {expected} but compared with a {found} literal")]
    IncompatibleLiteral { property: String, expected: PropertyType, found: LiteralKind },
    #[error("property `{property}` is declared {expected} but tested against a set of {found} elements")]
    IncompatibleSet { property: String, expected: PropertyType, found: LiteralKind },
    #[error("property `{property}` is not a collection")]
    NotACollection { property: String },
    #[error("collection `{property}` has primitive elements, `{segment}` cannot be accessed on them")]
    PrimitiveElementField { property: String, segment: String },
}

/// A token with valid shape but invalid content, or a malformed set.
#[derive(Debug, Error, PartialEq)]
pub enum LiteralError {
    #[error("invalid datetime literal `{raw}` at offset {offset}")]
    InvalidDateTime { raw: String, offset: usize },
    #[error("integer literal `{raw}` at offset {offset} is out of range")]
    IntegerOutOfRange { raw: String, offset: usize },
    #[error("set literal at offset {offset} mixes element types")]
    MixedSet { offset: usize },
    #[error("set literal at offset {offset} may only contain strings or integers")]
    UnsupportedSetElement { offset: usize },
}
