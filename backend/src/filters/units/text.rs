use super::{PredicateFilter, unsupported};
use crate::filters::error::FilterError;
use crate::filters::field::FilterCategory;
use crate::filters::operator::PredicateOperator;
use crate::filters::parse::{ParsedValue, parse_values};
use crate::filters::predicate::{Expr, Predicate};

/// Client-side wildcard accepted in LIKE patterns
const WILDCARD: &str = "*";
const SQL_WILDCARD: &str = "%";

/// Case-insensitive text filter.
///
/// `lk_a*b` becomes `UPPER(column) LIKE 'A%B'`, any other literal an
/// equality against the upper-cased value. Upper-casing is ASCII only, the
/// same as SQLite's `UPPER()`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFilter {
    name: String,
    values: Vec<ParsedValue<String>>,
}

impl TextFilter {
    pub fn extract(name: &str, raw: Option<&str>) -> Result<Option<Self>, FilterError> {
        let values = parse_values(raw, |alternative| {
            if alternative.is_null() {
                return Ok(alternative.without_value());
            }
            let like = PredicateOperator::strip_like_prefix(&alternative.literal)
                .map(|pattern| pattern.replace(WILDCARD, SQL_WILDCARD).to_ascii_uppercase());
            let parsed = match like {
                Some(pattern) => {
                    ParsedValue::new(PredicateOperator::Like, alternative.negated, pattern)
                }
                None => {
                    let value = alternative.literal.to_ascii_uppercase();
                    alternative.with_value(value)
                }
            };
            Ok(parsed)
        })?;

        Ok(values.map(|values| Self {
            name: name.to_string(),
            values,
        }))
    }
}

impl PredicateFilter for TextFilter {
    type Value = String;

    const CATEGORY: FilterCategory = FilterCategory::Text;

    fn name(&self) -> &str {
        &self.name
    }

    fn values(&self) -> &[ParsedValue<String>] {
        &self.values
    }

    fn field_expr(&self, column: &str) -> Expr {
        Expr::column(column).upper()
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
            PredicateOperator::Like => Ok(Predicate::like(expr, value.as_str(), negated)),
            other => Err(unsupported(other)),
        }
    }
}
