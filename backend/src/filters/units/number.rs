use super::{PredicateFilter, any_of, unsupported};
use crate::filters::error::FilterError;
use crate::filters::field::FilterCategory;
use crate::filters::operator::PredicateOperator;
use crate::filters::parse::{ParsedValue, parse_values};
use crate::filters::predicate::{Expr, Predicate};
use crate::orm::SqlValue;

/// 64-bit integer filter.
///
/// Plain equality alternatives of a single polarity collapse into one
/// `IN` / `NOT IN` fragment. Anything else is an OR of comparisons.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberFilter {
    name: String,
    values: Vec<ParsedValue<i64>>,
}

impl NumberFilter {
    pub fn extract(name: &str, raw: Option<&str>) -> Result<Option<Self>, FilterError> {
        let values = parse_values(raw, |alternative| {
            if alternative.is_null() {
                return Ok(alternative.without_value());
            }
            match alternative.literal.parse::<i64>() {
                Ok(value) => Ok(alternative.with_value(value)),
                Err(e) => Err(FilterError::wrong_value(
                    name,
                    FilterCategory::Number.as_str(),
                    alternative.literal,
                    e,
                )),
            }
        })?;

        Ok(values.map(|values| Self {
            name: name.to_string(),
            values,
        }))
    }

    /// Membership fragment when every alternative is an equality of the same polarity
    fn membership(&self, column: &str) -> Option<Predicate> {
        let first = self.values.first()?;
        let uniform = self.values.iter().all(|parsed| {
            parsed.operator == PredicateOperator::Equals && parsed.negated == first.negated
        });
        if !uniform {
            return None;
        }

        let members = self
            .values
            .iter()
            .filter_map(|parsed| parsed.value.map(SqlValue::Int))
            .collect();
        Some(Predicate::in_list(Expr::column(column), members, first.negated))
    }
}

impl PredicateFilter for NumberFilter {
    type Value = i64;

    const CATEGORY: FilterCategory = FilterCategory::Number;

    fn name(&self) -> &str {
        &self.name
    }

    fn values(&self) -> &[ParsedValue<i64>] {
        &self.values
    }

    fn value_predicate(
        &self,
        expr: Expr,
        operator: PredicateOperator,
        negated: bool,
        value: &i64,
    ) -> Result<Predicate, FilterError> {
        match operator {
            PredicateOperator::Equals => Ok(Predicate::equal(expr, *value, negated)),
            other => Err(unsupported(other)),
        }
    }

    fn predicate(&self, column: &str) -> Result<Predicate, FilterError> {
        match self.membership(column) {
            Some(predicate) => Ok(predicate),
            None => any_of(self, column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn compile(raw: &str) -> (String, Vec<SqlValue>) {
        NumberFilter::extract("id", Some(raw))
            .unwrap()
            .unwrap()
            .predicate("id")
            .unwrap()
            .to_sql()
    }

    #[test]
    fn test_equalities_become_in() {
        assert_eq!(
            compile("5|7"),
            (
                "id IN (?, ?)".to_string(),
                vec![SqlValue::Int(5), SqlValue::Int(7)]
            )
        );
    }

    #[test]
    fn test_negated_equalities_become_not_in() {
        assert_eq!(
            compile("not_5|not_7"),
            (
                "id NOT IN (?, ?)".to_string(),
                vec![SqlValue::Int(5), SqlValue::Int(7)]
            )
        );
    }

    #[test]
    fn test_single_value_uses_membership() {
        assert_eq!(compile("-3"), ("id IN (?)".to_string(), vec![SqlValue::Int(-3)]));
    }

    #[test]
    fn test_mixed_polarity_falls_back_to_or() {
        assert_eq!(
            compile("not_5|7"),
            (
                "id <> ? OR id = ?".to_string(),
                vec![SqlValue::Int(5), SqlValue::Int(7)]
            )
        );
    }

    #[test]
    fn test_null_falls_back_to_or() {
        assert_eq!(
            compile("5|null"),
            ("id = ? OR id IS NULL".to_string(), vec![SqlValue::Int(5)])
        );
        assert_eq!(compile("not_null"), ("id IS NOT NULL".to_string(), vec![]));
    }

    #[test]
    fn test_bad_literal_names_field_and_value() {
        let error = NumberFilter::extract("id", Some("5|five")).unwrap_err();
        assert_matches!(
            &error,
            FilterError::WrongFilterValue { field, type_name: "number", value, cause: Some(_) }
                if field == "id" && value == "five"
        );
        assert_eq!(error.error_type().code(), 202);
    }

    #[test]
    fn test_overflow_is_rejected() {
        assert!(NumberFilter::extract("id", Some("99999999999999999999")).is_err());
    }
}
