//! Shared grammar of encoded filter values
//!
//! A raw value such as `not_5|7|null` holds OR-ed alternatives separated by
//! `|`. Each alternative may start with a case-insensitive `not_` and may be
//! the literal `null`. Categories refine the operator and coerce the literal
//! on top of this.

use super::error::FilterError;
use super::operator::{PredicateOperator, strip_prefix_ignore_case};

const OR_DELIMITER: char = '|';
const NOT_PREFIX: &str = "not_";

/// One alternative after negation and null detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternative {
    pub operator: PredicateOperator,
    pub negated: bool,
    /// Literal with the `not_` prefix removed
    pub literal: String,
}

impl Alternative {
    fn parse(piece: &str) -> Self {
        let (negated, literal) = match strip_prefix_ignore_case(piece, NOT_PREFIX) {
            Some(rest) => (true, rest),
            None => (false, piece),
        };
        let operator = if literal.eq_ignore_ascii_case(PredicateOperator::Null.token()) {
            PredicateOperator::Null
        } else {
            PredicateOperator::Equals
        };
        Self {
            operator,
            negated,
            literal: literal.to_string(),
        }
    }

    pub fn is_null(&self) -> bool {
        self.operator == PredicateOperator::Null
    }

    /// Typed value with the same operator and polarity
    pub fn with_value<V>(self, value: V) -> ParsedValue<V> {
        ParsedValue {
            operator: self.operator,
            negated: self.negated,
            value: Some(value),
        }
    }

    /// Typed value for a `null` alternative
    pub fn without_value<V>(self) -> ParsedValue<V> {
        ParsedValue {
            operator: self.operator,
            negated: self.negated,
            value: None,
        }
    }
}

/// Typed, operator-tagged value of one alternative.
///
/// `value` is `None` exactly when `operator` is [`PredicateOperator::Null`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedValue<V> {
    pub operator: PredicateOperator,
    pub negated: bool,
    pub value: Option<V>,
}

impl<V> ParsedValue<V> {
    pub fn new(operator: PredicateOperator, negated: bool, value: V) -> Self {
        Self {
            operator,
            negated,
            value: Some(value),
        }
    }
}

/// Split a raw value into alternatives.
///
/// Trailing empty pieces are dropped, so an absent or empty raw value yields
/// no alternatives at all.
pub fn split_alternatives(raw: Option<&str>) -> Vec<Alternative> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let mut pieces: Vec<&str> = raw.split(OR_DELIMITER).collect();
    while pieces.last().is_some_and(|piece| piece.is_empty()) {
        pieces.pop();
    }
    pieces.into_iter().map(Alternative::parse).collect()
}

/// Parse every alternative of `raw` with a category-specific refinement.
///
/// `Ok(None)` means the field contributes no predicate.
pub fn parse_values<V, F>(raw: Option<&str>, refine: F) -> Result<Option<Vec<ParsedValue<V>>>, FilterError>
where
    F: FnMut(Alternative) -> Result<ParsedValue<V>, FilterError>,
{
    let alternatives = split_alternatives(raw);
    if alternatives.is_empty() {
        return Ok(None);
    }
    alternatives
        .into_iter()
        .map(refine)
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
