use serde::{Deserialize, Serialize};

/// A property reference: one identifier, or several separated by `/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathExpr {
    pub segments: Vec<String>,
    /// Byte offset of the first segment in the source text.
    pub offset: usize,
}

impl PathExpr {
    pub fn name(&self) -> String { self.segments.join("/") }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiteralKind {
    String,
    Integer,
    DateTime,
}

impl std::fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralKind::String => write!(f, "string"),
            LiteralKind::Integer => write!(f, "integer"),
            LiteralKind::DateTime => write!(f, "datetime"),
        }
    }
}

/// A literal as it appeared in the source. `text` is the unquoted,
/// unescaped content for strings and the raw token for integers and
/// datetimes; semantic parsing happens during coercion, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: String,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// `path eq literal`. Equality is the only comparison operator in the
    /// supported subset; rejected operators never reach the tree.
    Comparison { path: PathExpr, literal: Literal },
    /// `path in (literal, ...)`
    In { path: PathExpr, items: Vec<Literal> },
    /// `path/any(var: body)`. The body is a single Comparison or In whose
    /// path starts with `var`; the parser enforces the shape.
    Any { path: PathExpr, var: String, body: Box<Predicate> },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}
