use super::{PredicateFilter, unsupported};
use crate::filters::error::FilterError;
use crate::filters::field::FilterCategory;
use crate::filters::operator::PredicateOperator;
use crate::filters::parse::{ParsedValue, parse_values};
use crate::filters::predicate::{Expr, Predicate};

/// Lenient enumeration filter.
///
/// Compares the textual name of the stored value, so an unknown literal
/// simply matches nothing. Enumerations registered in the
/// [`EnumRegistry`](crate::filters::EnumRegistry) are parsed strictly instead.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumFilter {
    name: String,
    values: Vec<ParsedValue<String>>,
}

impl EnumFilter {
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

impl PredicateFilter for EnumFilter {
    type Value = String;

    const CATEGORY: FilterCategory = FilterCategory::Enum;

    fn name(&self) -> &str {
        &self.name
    }

    fn values(&self) -> &[ParsedValue<String>] {
        &self.values
    }

    fn field_expr(&self, column: &str) -> Expr {
        Expr::column(column).as_text()
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::SqlValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_compares_textual_name() {
        let (sql, values) = EnumFilter::extract("kind", Some("TEMPLATE|not_whatever|null"))
            .unwrap()
            .unwrap()
            .predicate("kind")
            .unwrap()
            .to_sql();
        assert_eq!(
            sql,
            "CAST(kind AS TEXT) = ? OR CAST(kind AS TEXT) <> ? OR kind IS NULL"
        );
        assert_eq!(
            values,
            vec![SqlValue::from("TEMPLATE"), SqlValue::from("whatever")]
        );
    }
}
