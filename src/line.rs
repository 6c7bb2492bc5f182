//! Classify one line of a specification document using PEST.
//!
//! Only four line shapes carry meaning; every other line is [`Line::Other`].
//! Lines are expected with trailing whitespace already stripped, which is what
//! [`classify`] does before matching.

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser as PestParser;

#[derive(PestParser)]
#[grammar = "line.pest"]
struct LineParser;

/// The shape of one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// `* 0x<hex> (<NAME>): ...`; `value` is the hex digits without `0x`.
    Mask { value: &'a str, name: &'a str },
    /// ``1. type: <expr> (`<name>`)``
    TypeHeader { value: &'a str, name: &'a str },
    /// `2. data:`
    DataMarker,
    /// `    * [<size>:<name>]`
    Field { size: &'a str, name: &'a str },
    Other,
}

/// Classify `line`. Checks run in the order mask, type header, data marker, field.
pub fn classify(line: &str) -> Line<'_> {
    let line = line.trim_end();
    if let Some(pair) = parse_rule(Rule::mask_line, line) {
        let (value, name) = two_children(pair);
        return Line::Mask { value, name };
    }
    if let Some(pair) = parse_rule(Rule::type_line, line) {
        let (value, name) = two_children(pair);
        return Line::TypeHeader { value, name };
    }
    if parse_rule(Rule::data_marker, line).is_some() {
        return Line::DataMarker;
    }
    if let Some(pair) = parse_rule(Rule::field_line, line) {
        let (size, name) = two_children(pair);
        return Line::Field { size, name };
    }
    Line::Other
}

fn parse_rule(rule: Rule, line: &str) -> Option<Pair<'_, Rule>> {
    LineParser::parse(rule, line).ok()?.next()
}

/// The first two named children of a line rule, in grammar order.
fn two_children(pair: Pair<'_, Rule>) -> (&str, &str) {
    let mut inner = pair
        .into_inner()
        .filter(|p| p.as_rule() != Rule::EOI)
        .map(|p| p.as_str());
    let first = inner.next().unwrap_or_default();
    let second = inner.next().unwrap_or_default();
    (first, second)
}
