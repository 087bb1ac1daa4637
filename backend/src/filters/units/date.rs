use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{PredicateFilter, unsupported};
use crate::db::sqlite_helpers::str_to_datetime;
use crate::filters::error::FilterError;
use crate::filters::field::FilterCategory;
use crate::filters::operator::PredicateOperator;
use crate::filters::parse::{Alternative, ParsedValue, parse_values};
use crate::filters::predicate::{CompareOp, Expr, Predicate};

/// `<start><op><date>` where `op` is any two-letter token
static OPERATOR_INFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<start>.*?)(?P<op>[A-Za-z]{2})(?P<end>\d{4}-\d{2}-\d{2}.*)$")
        .expect("valid date operator regex")
});

/// `<date>bt` with the upper bound missing
static OPEN_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}.*[Bb][Tt]$").expect("valid open range regex"));

/// Coerced date literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue {
    At(NaiveDateTime),
    /// Inclusive on both ends
    Range {
        from: NaiveDateTime,
        to: NaiveDateTime,
    },
}

/// Timestamp filter.
///
/// Literal grammar, after `not_` and `null` handling:
///
/// | literal            | meaning              |
/// |--------------------|----------------------|
/// | `<date>`           | equals               |
/// | `eq<date>`         | equals               |
/// | `lt<date>`         | strictly before      |
/// | `gt<date>`         | strictly after       |
/// | `<date>bt<date>`   | inclusive range      |
///
/// Dates are `YYYY-MM-DD HH:MM:SS`, RFC 3339, or a bare `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq)]
pub struct DateFilter {
    name: String,
    values: Vec<ParsedValue<DateValue>>,
}

impl DateFilter {
    pub fn extract(name: &str, raw: Option<&str>) -> Result<Option<Self>, FilterError> {
        let values = parse_values(raw, |alternative| {
            if alternative.is_null() {
                return Ok(alternative.without_value());
            }
            parse_alternative(name, alternative)
        })?;

        Ok(values.map(|values| Self {
            name: name.to_string(),
            values,
        }))
    }
}

fn parse_alternative(
    name: &str,
    alternative: Alternative,
) -> Result<ParsedValue<DateValue>, FilterError> {
    let literal = alternative.literal.as_str();
    let negated = alternative.negated;

    let Some(captures) = OPERATOR_INFIX.captures(literal) else {
        if OPEN_RANGE.is_match(literal) {
            return Err(empty_bound(name, literal));
        }
        let at = parse_date(name, literal, literal)?;
        return Ok(ParsedValue::new(PredicateOperator::Equals, negated, DateValue::At(at)));
    };

    let start = &captures["start"];
    let end = &captures["end"];
    let operator = PredicateOperator::resolve(&captures["op"]);

    match (operator, start.is_empty()) {
        (Some(PredicateOperator::Between), true) => Err(empty_bound(name, literal)),
        (Some(PredicateOperator::Between), false) => {
            let from = parse_date(name, start, literal)?;
            let to = parse_date(name, end, literal)?;
            Ok(ParsedValue::new(
                PredicateOperator::Between,
                negated,
                DateValue::Range { from, to },
            ))
        }
        (
            Some(
                operator @ (PredicateOperator::Equals
                | PredicateOperator::Inferior
                | PredicateOperator::Superior),
            ),
            true,
        ) => {
            let at = parse_date(name, end, literal)?;
            Ok(ParsedValue::new(operator, negated, DateValue::At(at)))
        }
        _ => Err(FilterError::WrongFilterOperator {
            field: name.to_string(),
            value: literal.to_string(),
        }),
    }
}

fn parse_date(name: &str, date: &str, literal: &str) -> Result<NaiveDateTime, FilterError> {
    str_to_datetime(date)
        .map_err(|e| FilterError::wrong_value(name, FilterCategory::Date.as_str(), literal, e))
}

fn empty_bound(name: &str, literal: &str) -> FilterError {
    FilterError::EmptyValue {
        field: name.to_string(),
        type_name: FilterCategory::Date.as_str(),
        value: literal.to_string(),
    }
}

impl PredicateFilter for DateFilter {
    type Value = DateValue;

    const CATEGORY: FilterCategory = FilterCategory::Date;

    fn name(&self) -> &str {
        &self.name
    }

    fn values(&self) -> &[ParsedValue<DateValue>] {
        &self.values
    }

    fn value_predicate(
        &self,
        expr: Expr,
        operator: PredicateOperator,
        negated: bool,
        value: &DateValue,
    ) -> Result<Predicate, FilterError> {
        let negate = |predicate: Predicate| {
            if negated {
                Predicate::not(predicate)
            } else {
                predicate
            }
        };

        match (operator, *value) {
            (PredicateOperator::Equals, DateValue::At(at)) => {
                Ok(Predicate::equal(expr, at, negated))
            }
            (PredicateOperator::Inferior, DateValue::At(at)) => {
                Ok(negate(Predicate::compare(expr, CompareOp::Lt, at)))
            }
            (PredicateOperator::Superior, DateValue::At(at)) => {
                Ok(negate(Predicate::compare(expr, CompareOp::Gt, at)))
            }
            (PredicateOperator::Between, DateValue::Range { from, to }) => {
                Ok(Predicate::between(expr, from, to, negated))
            }
            (other, _) => Err(unsupported(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite_helpers::datetime_to_str;
    use crate::filters::error::ErrorType;
    use crate::orm::SqlValue;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn at(s: &str) -> NaiveDateTime {
        str_to_datetime(s).unwrap()
    }

    fn compile(raw: &str) -> (String, Vec<SqlValue>) {
        DateFilter::extract("insertDate", Some(raw))
            .unwrap()
            .unwrap()
            .predicate("insert_date")
            .unwrap()
            .to_sql()
    }

    #[test]
    fn test_plain_date_is_equality() {
        assert_eq!(
            compile("2019-01-01 10:00:00"),
            (
                "insert_date = ?".to_string(),
                vec![SqlValue::Timestamp(at("2019-01-01 10:00:00"))]
            )
        );
        assert_eq!(compile("eq2019-01-01").0, "insert_date = ?");
    }

    #[test]
    fn test_open_ranges() {
        assert_eq!(
            compile("lt2019-01-01|GT2020-01-01 00:00:00"),
            (
                "insert_date < ? OR insert_date > ?".to_string(),
                vec![
                    SqlValue::Timestamp(at("2019-01-01")),
                    SqlValue::Timestamp(at("2020-01-01")),
                ]
            )
        );
    }

    #[test]
    fn test_closed_range_is_inclusive() {
        let (sql, values) = compile("2019-01-01 00:00:00bt2019-12-31 23:59:59");
        assert_eq!(sql, "insert_date BETWEEN ? AND ?");
        let rendered: Vec<String> = values
            .into_iter()
            .map(|value| match value {
                SqlValue::Timestamp(dt) => datetime_to_str(dt),
                other => panic!("unexpected bind value {other:?}"),
            })
            .collect();
        assert_eq!(rendered, vec!["2019-01-01 00:00:00", "2019-12-31 23:59:59"]);
    }

    #[test]
    fn test_negation() {
        assert_eq!(compile("not_lt2019-01-01").0, "NOT (insert_date < ?)");
        assert_eq!(
            compile("not_2019-01-01bt2019-02-01").0,
            "insert_date NOT BETWEEN ? AND ?"
        );
        assert_eq!(compile("not_2019-01-01").0, "insert_date <> ?");
    }

    #[test]
    fn test_rfc3339_bounds() {
        let filter = DateFilter::extract(
            "insertDate",
            Some("2019-01-01T00:00:00Zbt2019-01-02T00:00:00+01:00"),
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            filter.values()[0].value,
            Some(DateValue::Range {
                from: at("2019-01-01 00:00:00"),
                to: at("2019-01-01 23:00:00"),
            })
        );
    }

    #[test]
    fn test_missing_lower_bound() {
        let error = DateFilter::extract("insertDate", Some("bt2019-01-01")).unwrap_err();
        assert_matches!(&error, FilterError::EmptyValue { field, .. } if field == "insertDate");
        assert_eq!(error.error_type(), ErrorType::EmptyValue);
    }

    #[test]
    fn test_missing_upper_bound() {
        let error = DateFilter::extract("insertDate", Some("2019-01-01bt")).unwrap_err();
        assert_eq!(error.error_type(), ErrorType::EmptyValue);
    }

    #[test]
    fn test_unknown_operator() {
        for raw in ["aa2019-01-01", "2019-01-01aa2019-01-02", "2019-01-01lt2019-01-02"] {
            let error = DateFilter::extract("insertDate", Some(raw)).unwrap_err();
            assert_matches!(
                &error,
                FilterError::WrongFilterOperator { value, .. } if value == raw
            );
        }
    }

    #[test]
    fn test_unparseable_date() {
        for raw in ["bad", "lt2019-13-45", "2019-01-01bt2019-99-01"] {
            let error = DateFilter::extract("insertDate", Some(raw)).unwrap_err();
            assert_matches!(
                &error,
                FilterError::WrongFilterValue { type_name: "date", value, .. } if value == raw
            );
        }
    }
}
