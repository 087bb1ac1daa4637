//! Typed filter units, one per filter category
//!
//! A unit owns the parsed alternatives of one field and knows how to turn
//! them into a [`Predicate`]. Units are built fresh for every compile call
//! and never mutated after extraction.

mod boolean;
mod date;
mod enumeration;
mod identifier;
mod number;
mod text;
mod token;

use std::fmt;

pub use boolean::BooleanFilter;
pub use date::{DateFilter, DateValue};
pub use enumeration::EnumFilter;
pub use identifier::IdentifierFilter;
pub use number::NumberFilter;
pub use text::TextFilter;
pub use token::TokenFilter;

use super::error::FilterError;
use super::field::FilterCategory;
use super::operator::PredicateOperator;
use super::parse::ParsedValue;
use super::predicate::{Expr, Predicate};

/// Typed filter unit.
///
/// Implementors only describe how one non-null alternative is compared.
/// `null` alternatives and the OR across alternatives are handled here.
pub trait PredicateFilter {
    /// Coerced literal type
    type Value;

    const CATEGORY: FilterCategory;

    /// Filter key the unit was extracted for
    fn name(&self) -> &str;

    fn values(&self) -> &[ParsedValue<Self::Value>];

    /// Name reported in errors raised by this unit
    fn type_name(&self) -> &'static str {
        Self::CATEGORY.as_str()
    }

    /// Expression non-null alternatives are compared against
    fn field_expr(&self, column: &str) -> Expr {
        Expr::column(column)
    }

    /// Fragment for one non-null alternative
    fn value_predicate(
        &self,
        expr: Expr,
        operator: PredicateOperator,
        negated: bool,
        value: &Self::Value,
    ) -> Result<Predicate, FilterError>;

    /// OR of every alternative bound to `column`
    fn predicate(&self, column: &str) -> Result<Predicate, FilterError> {
        any_of(self, column)
    }
}

/// Default emission: one fragment per alternative, combined with OR.
pub(crate) fn any_of<F>(filter: &F, column: &str) -> Result<Predicate, FilterError>
where
    F: PredicateFilter + ?Sized,
{
    let mut fragments = Vec::with_capacity(filter.values().len());
    for parsed in filter.values() {
        let fragment = match (&parsed.value, parsed.operator) {
            (_, PredicateOperator::Null) => Predicate::is_null(Expr::column(column), parsed.negated),
            (Some(value), operator) => {
                filter.value_predicate(filter.field_expr(column), operator, parsed.negated, value)?
            }
            (None, operator) => {
                return Err(FilterError::UnknownOperator {
                    token: operator.token().to_string(),
                });
            }
        };
        fragments.push(fragment);
    }
    Ok(Predicate::or(fragments))
}

/// Error for an operator a unit never produces itself
pub(crate) fn unsupported(operator: PredicateOperator) -> FilterError {
    FilterError::UnknownOperator {
        token: operator.token().to_string(),
    }
}

/// Object-safe view of a unit used by the compiler.
pub trait FieldFilter: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn category(&self) -> FilterCategory;

    /// Number of OR-ed alternatives
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn predicate(&self, column: &str) -> Result<Predicate, FilterError>;
}

impl<T> FieldFilter for T
where
    T: PredicateFilter + fmt::Debug + Send + Sync,
{
    fn name(&self) -> &str {
        PredicateFilter::name(self)
    }

    fn category(&self) -> FilterCategory {
        T::CATEGORY
    }

    fn len(&self) -> usize {
        self.values().len()
    }

    fn predicate(&self, column: &str) -> Result<Predicate, FilterError> {
        PredicateFilter::predicate(self, column)
    }
}

/// Extract the unit matching `category` from a raw value.
///
/// `Ok(None)` means the field contributes no predicate.
pub fn extract(
    category: FilterCategory,
    name: &str,
    raw: Option<&str>,
) -> Result<Option<Box<dyn FieldFilter>>, FilterError> {
    fn boxed<F: FieldFilter + 'static>(filter: Option<F>) -> Option<Box<dyn FieldFilter>> {
        filter.map(|f| Box::new(f) as Box<dyn FieldFilter>)
    }

    Ok(match category {
        FilterCategory::Text => boxed(TextFilter::extract(name, raw)?),
        FilterCategory::Number => boxed(NumberFilter::extract(name, raw)?),
        FilterCategory::Boolean => boxed(BooleanFilter::extract(name, raw)?),
        FilterCategory::Date => boxed(DateFilter::extract(name, raw)?),
        FilterCategory::Token => boxed(TokenFilter::extract(name, raw)?),
        FilterCategory::Enum => boxed(EnumFilter::extract(name, raw)?),
        FilterCategory::Identifier => boxed(IdentifierFilter::extract(name, raw)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dispatch_by_category() {
        let filter = extract(FilterCategory::Number, "id", Some("5|7"))
            .unwrap()
            .unwrap();
        assert_eq!(filter.name(), "id");
        assert_eq!(filter.category(), FilterCategory::Number);
        assert_eq!(filter.len(), 2);
        assert_eq!(filter.predicate("id").unwrap().to_string(), "id IN (?, ?)");
    }

    #[test]
    fn test_absent_value_yields_no_unit() {
        for category in [
            FilterCategory::Text,
            FilterCategory::Number,
            FilterCategory::Boolean,
            FilterCategory::Date,
            FilterCategory::Token,
            FilterCategory::Enum,
            FilterCategory::Identifier,
        ] {
            assert!(extract(category, "f", None).unwrap().is_none());
            assert!(extract(category, "f", Some("")).unwrap().is_none());
        }
    }

    #[test]
    fn test_null_is_uniform_across_categories() {
        let filter = extract(FilterCategory::Text, "name", Some("null|not_null"))
            .unwrap()
            .unwrap();
        assert_eq!(
            filter.predicate("name").unwrap().to_string(),
            "name IS NULL OR name IS NOT NULL"
        );
    }
}
