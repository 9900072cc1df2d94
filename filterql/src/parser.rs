use crate::ast::{Literal, LiteralKind, PathExpr, Predicate};
use crate::error::{FilterError, LexError, ParseError};
use crate::grammar::{self, Rule};
use pest::error::{ErrorVariant, InputLocation};
use pest::iterators::{Pair, Pairs};
use pest::Parser;

pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Compilation limits. Nesting depth covers parentheses in groups, sets and
/// lambdas; deeply nested input is rejected before the grammar recurses.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self { Self { max_depth: DEFAULT_MAX_DEPTH } }
}

/// Parse a filter expression into a predicate AST.
pub fn parse_filter(input: &str) -> Result<Predicate, FilterError> { parse_filter_with(input, &ParseOptions::default()) }

pub fn parse_filter_with(input: &str, options: &ParseOptions) -> Result<Predicate, FilterError> {
    if input.trim().is_empty() {
        return Err(ParseError::Empty.into());
    }
    check_nesting(input, options.max_depth)?;

    let mut pairs =
        grammar::FilterParser::parse(Rule::Filter, input).map_err(|error| classify_failure(input, error))?;

    // Filter is a silent rule, so the Expr comes through directly.
    let expr = pairs.next().ok_or(ParseError::Empty)?;
    if expr.as_rule() != Rule::Expr {
        return Err(malformed(expr.as_span().start()).into());
    }
    parse_expr(expr)
}

/// Split a pest failure into the lexical and grammatical halves of the
/// error taxonomy: a failure sitting on a character the language has no
/// token for is a LexError, anything else is a syntax error carrying
/// pest's expected rules.
fn classify_failure(input: &str, error: pest::error::Error<Rule>) -> FilterError {
    let offset = match error.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    };

    if let Some(unexpected) = input[offset..].chars().next() {
        if !is_filter_char(unexpected) {
            return LexError { offset, unexpected }.into();
        }
    }

    let expected = match error.variant {
        ErrorVariant::ParsingError { positives, .. } => positives.iter().map(|rule| format!("{:?}", rule)).collect(),
        ErrorVariant::CustomError { message } => vec![message],
    };
    ParseError::Syntax { offset, expected }.into()
}

fn is_filter_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch.is_ascii_whitespace() || matches!(ch, '_' | '\'' | '(' | ')' | ',' | ':' | '/' | '-' | '.')
}

/// Parenthesis depth guard, aware of quoted strings and doubled-quote
/// escapes inside them.
fn check_nesting(input: &str, max_depth: usize) -> Result<(), ParseError> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_string {
            if ch == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                } else {
                    in_string = false;
                }
            }
        } else {
            match ch {
                '\'' => in_string = true,
                '(' => {
                    depth += 1;
                    if depth > max_depth {
                        return Err(ParseError::TooDeep { max_depth });
                    }
                }
                ')' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
    }
    Ok(())
}

fn malformed(offset: usize) -> ParseError { ParseError::Syntax { offset, expected: vec!["expression".to_string()] } }

fn unsupported(construct: impl Into<String>, offset: usize) -> FilterError {
    ParseError::UnsupportedConstruct { construct: construct.into(), offset }.into()
}

fn expect_next<'i>(pairs: &mut Pairs<'i, Rule>, offset: usize) -> Result<Pair<'i, Rule>, FilterError> {
    pairs.next().ok_or_else(|| malformed(offset).into())
}

/// Expr = AndGroup (Or AndGroup)*, folded left-associatively.
fn parse_expr(pair: Pair<Rule>) -> Result<Predicate, FilterError> {
    let offset = pair.as_span().start();
    let mut inner = pair.into_inner();
    let mut result = parse_and_group(expect_next(&mut inner, offset)?)?;
    while let Some(op) = inner.next() {
        debug_assert_eq!(op.as_rule(), Rule::Or);
        let right = parse_and_group(expect_next(&mut inner, op.as_span().end())?)?;
        result = Predicate::Or(Box::new(result), Box::new(right));
    }
    Ok(result)
}

fn parse_and_group(pair: Pair<Rule>) -> Result<Predicate, FilterError> {
    let offset = pair.as_span().start();
    let mut inner = pair.into_inner();
    let mut result = parse_term(expect_next(&mut inner, offset)?)?;
    while let Some(op) = inner.next() {
        debug_assert_eq!(op.as_rule(), Rule::And);
        let right = parse_term(expect_next(&mut inner, op.as_span().end())?)?;
        result = Predicate::And(Box::new(result), Box::new(right));
    }
    Ok(result)
}

fn parse_term(pair: Pair<Rule>) -> Result<Predicate, FilterError> {
    let offset = pair.as_span().start();
    match pair.as_rule() {
        Rule::ExpressionInParentheses => {
            let mut inner = pair.into_inner();
            parse_expr(expect_next(&mut inner, offset)?)
        }
        Rule::NotExpr => Err(unsupported("not", offset)),
        Rule::FunctionCall => {
            let mut inner = pair.into_inner();
            let name = expect_next(&mut inner, offset)?;
            Err(unsupported(name.as_str(), offset))
        }
        Rule::AnyClause => parse_any(pair),
        Rule::Clause => parse_clause(pair),
        _ => Err(malformed(offset).into()),
    }
}

fn parse_clause(pair: Pair<Rule>) -> Result<Predicate, FilterError> {
    let offset = pair.as_span().start();
    let mut inner = pair.into_inner();
    let path = parse_path(expect_next(&mut inner, offset)?)?;
    let op = expect_next(&mut inner, offset)?;
    match op.as_rule() {
        Rule::Eq => {
            let literal = parse_literal(expect_next(&mut inner, op.as_span().end())?)?;
            Ok(Predicate::Comparison { path, literal })
        }
        Rule::In => {
            let list = expect_next(&mut inner, op.as_span().end())?;
            let items = list.into_inner().map(parse_literal).collect::<Result<Vec<_>, _>>()?;
            Ok(Predicate::In { path, items })
        }
        Rule::NotEq | Rule::Gt | Rule::GtEq | Rule::Lt | Rule::LtEq => Err(unsupported(op.as_str(), op.as_span().start())),
        _ => Err(malformed(op.as_span().start()).into()),
    }
}

fn parse_any(pair: Pair<Rule>) -> Result<Predicate, FilterError> {
    let offset = pair.as_span().start();
    let mut inner = pair.into_inner();
    let path = parse_path(expect_next(&mut inner, offset)?)?;
    let var = expect_next(&mut inner, offset)?.as_str().to_string();

    let body_pair = expect_next(&mut inner, offset)?;
    let body_offset = body_pair.as_span().start();
    let mut body_inner = body_pair.into_inner();
    let body = parse_expr(expect_next(&mut body_inner, body_offset)?)?;

    // The lambda body is restricted to one comparison or membership test
    // against the range variable.
    let body_path = match &body {
        Predicate::Comparison { path, .. } | Predicate::In { path, .. } => path,
        Predicate::Any { .. } => return Err(unsupported("nested any", body_offset)),
        Predicate::And(..) | Predicate::Or(..) => return Err(unsupported("compound lambda body", body_offset)),
    };
    if body_path.segments.first().map(String::as_str) != Some(var.as_str()) {
        return Err(unsupported(format!("lambda body must reference `{}`", var), body_path.offset));
    }

    Ok(Predicate::Any { path, var, body: Box::new(body) })
}

fn parse_path(pair: Pair<Rule>) -> Result<PathExpr, FilterError> {
    let offset = pair.as_span().start();
    if pair.as_rule() != Rule::Path {
        return Err(malformed(offset).into());
    }
    let segments = pair.into_inner().map(|segment| segment.as_str().to_string()).collect();
    Ok(PathExpr { segments, offset })
}

fn parse_literal(pair: Pair<Rule>) -> Result<Literal, FilterError> {
    let offset = pair.as_span().start();
    match pair.as_rule() {
        Rule::SingleQuotedString => {
            let raw = pair.as_str();
            let text = raw[1..raw.len() - 1].replace("''", "'");
            Ok(Literal { kind: LiteralKind::String, text, offset })
        }
        Rule::Unsigned => Ok(Literal { kind: LiteralKind::Integer, text: pair.as_str().to_string(), offset }),
        Rule::DateTimeLiteral => Ok(Literal { kind: LiteralKind::DateTime, text: pair.as_str().to_string(), offset }),
        _ => Err(malformed(offset).into()),
    }
}
