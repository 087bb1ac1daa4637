use super::{PredicateFilter, unsupported};
use crate::filters::error::FilterError;
use crate::filters::field::FilterCategory;
use crate::filters::operator::PredicateOperator;
use crate::filters::parse::{ParsedValue, parse_values};
use crate::filters::predicate::{Expr, Predicate};

/// Boolean filter.
///
/// Parsing is lenient: only a case-insensitive `true` is true, any other
/// literal compares against false.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanFilter {
    name: String,
    values: Vec<ParsedValue<bool>>,
}

impl BooleanFilter {
    pub fn extract(name: &str, raw: Option<&str>) -> Result<Option<Self>, FilterError> {
        let values = parse_values(raw, |alternative| {
            if alternative.is_null() {
                return Ok(alternative.without_value());
            }
            let value = alternative.literal.eq_ignore_ascii_case("true");
            Ok(alternative.with_value(value))
        })?;

        Ok(values.map(|values| Self {
            name: name.to_string(),
            values,
        }))
    }
}

impl PredicateFilter for BooleanFilter {
    type Value = bool;

    const CATEGORY: FilterCategory = FilterCategory::Boolean;

    fn name(&self) -> &str {
        &self.name
    }

    fn values(&self) -> &[ParsedValue<bool>] {
        &self.values
    }

    fn value_predicate(
        &self,
        expr: Expr,
        operator: PredicateOperator,
        negated: bool,
        value: &bool,
    ) -> Result<Predicate, FilterError> {
        match operator {
            PredicateOperator::Equals => Ok(Predicate::equal(expr, *value, negated)),
            other => Err(unsupported(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::SqlValue;
    use pretty_assertions::assert_eq;

    fn compile(raw: &str) -> (String, Vec<SqlValue>) {
        BooleanFilter::extract("active", Some(raw))
            .unwrap()
            .unwrap()
            .predicate("active")
            .unwrap()
            .to_sql()
    }

    #[test]
    fn test_true_any_case() {
        for raw in ["true", "TRUE", "True"] {
            assert_eq!(
                compile(raw),
                ("active = ?".to_string(), vec![SqlValue::Bool(true)])
            );
        }
    }

    #[test]
    fn test_unparseable_is_false() {
        assert_eq!(
            compile("notaboolean"),
            ("active = ?".to_string(), vec![SqlValue::Bool(false)])
        );
        assert_eq!(
            compile("yes"),
            ("active = ?".to_string(), vec![SqlValue::Bool(false)])
        );
    }

    #[test]
    fn test_negation() {
        assert_eq!(
            compile("not_true|null"),
            (
                "active <> ? OR active IS NULL".to_string(),
                vec![SqlValue::Bool(true)]
            )
        );
    }
}
