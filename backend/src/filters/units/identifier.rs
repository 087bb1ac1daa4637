use uuid::Uuid;
use uuid::fmt::Hyphenated;

use super::{PredicateFilter, unsupported};
use crate::filters::error::{Cause, FilterError};
use crate::filters::field::FilterCategory;
use crate::filters::operator::PredicateOperator;
use crate::filters::parse::{ParsedValue, parse_values};
use crate::filters::predicate::{Expr, Predicate};

/// UUID filter; equality and inequality only.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierFilter {
    name: String,
    values: Vec<ParsedValue<Uuid>>,
}

impl IdentifierFilter {
    pub fn extract(name: &str, raw: Option<&str>) -> Result<Option<Self>, FilterError> {
        let values = parse_values(raw, |alternative| {
            if alternative.is_null() {
                return Ok(alternative.without_value());
            }
            match parse_hyphenated(&alternative.literal) {
                Ok(id) => Ok(alternative.with_value(id)),
                Err(e) => Err(FilterError::wrong_value(
                    name,
                    FilterCategory::Identifier.as_str(),
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
}

/// Only the 36-character hyphenated form is accepted; hex digits may be
/// either case.
fn parse_hyphenated(literal: &str) -> Result<Uuid, Cause> {
    if literal.len() != Hyphenated::LENGTH {
        return Err(format!("expected {} characters in hyphenated form", Hyphenated::LENGTH).into());
    }
    Ok(Uuid::try_parse(literal)?)
}

impl PredicateFilter for IdentifierFilter {
    type Value = Uuid;

    const CATEGORY: FilterCategory = FilterCategory::Identifier;

    fn name(&self) -> &str {
        &self.name
    }

    fn values(&self) -> &[ParsedValue<Uuid>] {
        &self.values
    }

    fn value_predicate(
        &self,
        expr: Expr,
        operator: PredicateOperator,
        negated: bool,
        value: &Uuid,
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
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_canonical_round_trip() {
        let id = Uuid::new_v4();
        let filter = IdentifierFilter::extract("id", Some(&id.to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(filter.values()[0].value, Some(id));

        let (sql, values) = filter.predicate("id").unwrap().to_sql();
        assert_eq!(sql, "id = ?");
        assert_eq!(values, vec![SqlValue::Uuid(id)]);
    }

    #[test]
    fn test_negated_and_null() {
        let id = Uuid::new_v4();
        let raw = format!("not_{id}|not_null");
        let predicate = IdentifierFilter::extract("id", Some(&raw))
            .unwrap()
            .unwrap()
            .predicate("id")
            .unwrap();
        assert_eq!(predicate.to_string(), "id <> ? OR id IS NOT NULL");
    }

    #[test]
    fn test_malformed_identifier() {
        let error = IdentifierFilter::extract("id", Some("not-a-uuid")).unwrap_err();
        assert_matches!(
            &error,
            FilterError::WrongFilterValue { field, type_name: "identifier", value, .. }
                if field == "id" && value == "not-a-uuid"
        );
    }

    #[test]
    fn test_upper_case_hex_is_accepted() {
        let id = Uuid::new_v4();
        let raw = id.hyphenated().to_string().to_ascii_uppercase();
        let filter = IdentifierFilter::extract("id", Some(&raw)).unwrap().unwrap();
        assert_eq!(filter.values()[0].value, Some(id));
    }

    #[test]
    fn test_non_hyphenated_forms_are_rejected() {
        let id = Uuid::new_v4();
        for raw in [
            id.simple().to_string(),
            id.braced().to_string(),
            id.urn().to_string(),
        ] {
            let error = IdentifierFilter::extract("id", Some(&raw)).unwrap_err();
            assert_matches!(
                &error,
                FilterError::WrongFilterValue { field, type_name: "identifier", value, .. }
                    if field == "id" && *value == raw
            );
        }
    }

    #[test]
    fn test_hyphen_in_wrong_place_is_rejected() {
        // right length, wrong grouping
        let error =
            IdentifierFilter::extract("id", Some("67e5504-410b1-426f-9247-bb680e5fe0c8")).unwrap_err();
        assert_matches!(error, FilterError::WrongFilterValue { type_name: "identifier", .. });
    }
}
