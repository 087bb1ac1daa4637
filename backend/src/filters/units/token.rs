use super::{PredicateFilter, unsupported};
use crate::filters::error::FilterError;
use crate::filters::field::FilterCategory;
use crate::filters::operator::PredicateOperator;
use crate::filters::parse::{ParsedValue, parse_values};
use crate::filters::predicate::{Expr, Predicate};

/// Opaque, case-sensitive equality filter.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenFilter {
    name: String,
    values: Vec<ParsedValue<String>>,
}

impl TokenFilter {
    pub fn extract(name: &str, raw: Option<&str>) -> Result<Option<Self>, FilterError> {
        let values = parse_values(raw, |alternative| {
            if alternative.is_null() {
                return Ok(alternative.without_value());
            }
            let value = alternative.literal.clone();
            Ok(alternative.with_value(value))
        })?;

        Ok(values.map(|values| Self {
            name: name.to_string(),
            values,
        }))
    }
}

impl PredicateFilter for TokenFilter {
    type Value = String;

    const CATEGORY: FilterCategory = FilterCategory::Token;

    fn name(&self) -> &str {
        &self.name
    }

    fn values(&self) -> &[ParsedValue<String>] {
        &self.values
    }

    fn value_predicate(
        &self,
        expr: Expr,
        operator: PredicateOperator,
        negated: bool,
        value: &String,
    ) -> Result<Predicate, FilterError> {
        match operator {
            PredicateOperator::Equals => Ok(Predicate::equal(expr, value.as_str(), negated)),
            other => Err(unsupported(other)),
        }
    }
}
