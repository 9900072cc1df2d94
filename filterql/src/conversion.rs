use crate::ast::Predicate;
use crate::error::FilterError;
use crate::parser;

impl<'a> TryFrom<&'a str> for Predicate {
    type Error = FilterError;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> { parser::parse_filter(value) }
}

impl TryFrom<String> for Predicate {
    type Error = FilterError;

    fn try_from(value: String) -> Result<Self, Self::Error> { parser::parse_filter(&value) }
}
