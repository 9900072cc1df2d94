use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "filterql.pest"]
pub struct FilterParser;
