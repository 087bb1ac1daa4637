//! Strict parsing for closed enumerations
//!
//! Fields whose declared value type is registered here bypass the lenient
//! [`EnumFilter`](super::units::EnumFilter) and reject any literal that is not
//! exactly one of the enumeration's member names. The registry is keyed by
//! value type, so one registration covers every entity using that type.

use std::any::TypeId;
use std::collections::HashMap;

use super::error::FilterError;
use super::field::{FilterCategory, ValueType};
use super::operator::PredicateOperator;
use super::parse::{ParsedValue, parse_values};
use super::predicate::{Expr, Predicate};
use super::units::{PredicateFilter, unsupported};

/// Closed enumeration usable as a strictly parsed filter value.
///
/// Implemented by `#[derive(FilterEnum)]` macro.
pub trait FilterEnum: Sized + 'static {
    /// Type name reported in parse errors
    const TYPE_NAME: &'static str;

    /// Member names in declaration order
    const VARIANTS: &'static [&'static str];

    fn as_str(&self) -> &'static str;

    /// Exact, case-sensitive lookup
    fn from_name(name: &str) -> Option<Self>;
}

/// Type-erased strict parser for one enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumParser {
    pub type_name: &'static str,
    pub variants: &'static [&'static str],
}

impl EnumParser {
    pub fn of<T: FilterEnum>() -> Self {
        Self {
            type_name: T::TYPE_NAME,
            variants: T::VARIANTS,
        }
    }

    /// Member name equal to `literal`
    pub fn parse(&self, field: &str, literal: &str) -> Result<&'static str, FilterError> {
        self.variants
            .iter()
            .find(|variant| **variant == literal)
            .copied()
            .ok_or_else(|| FilterError::InvalidEnum {
                type_name: self.type_name,
                field: field.to_string(),
                value: literal.to_string(),
            })
    }

    pub fn extract(
        &self,
        name: &str,
        raw: Option<&str>,
    ) -> Result<Option<StrictEnumFilter>, FilterError> {
        let values = parse_values(raw, |alternative| {
            if alternative.is_null() {
                return Ok(alternative.without_value());
            }
            let member = self.parse(name, &alternative.literal)?;
            Ok(alternative.with_value(member))
        })?;

        Ok(values.map(|values| StrictEnumFilter {
            name: name.to_string(),
            type_name: self.type_name,
            values,
        }))
    }
}

/// Enumeration filter built by [`EnumParser::extract`]
#[derive(Debug, Clone, PartialEq)]
pub struct StrictEnumFilter {
    name: String,
    type_name: &'static str,
    values: Vec<ParsedValue<&'static str>>,
}

impl PredicateFilter for StrictEnumFilter {
    type Value = &'static str;

    const CATEGORY: FilterCategory = FilterCategory::Enum;

    fn name(&self) -> &str {
        &self.name
    }

    fn values(&self) -> &[ParsedValue<&'static str>] {
        &self.values
    }

    fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn value_predicate(
        &self,
        expr: Expr,
        operator: PredicateOperator,
        negated: bool,
        value: &&'static str,
    ) -> Result<Predicate, FilterError> {
        match operator {
            PredicateOperator::Equals => Ok(Predicate::equal(expr, *value, negated)),
            other => Err(unsupported(other)),
        }
    }
}

/// Value-type keyed table of strict enumeration parsers.
#[derive(Debug, Clone, Default)]
pub struct EnumRegistry {
    parsers: HashMap<TypeId, EnumParser>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T`; a second registration replaces the first
    pub fn register<T: FilterEnum>(&mut self) -> &mut Self {
        self.parsers.insert(TypeId::of::<T>(), EnumParser::of::<T>());
        self
    }

    pub fn with<T: FilterEnum>(mut self) -> Self {
        self.register::<T>();
        self
    }

    /// Parser for `value_type`, `None` when it is not registered
    pub fn lookup(&self, value_type: &ValueType) -> Option<&EnumParser> {
        self.parsers.get(&value_type.id())
    }

    pub fn contains(&self, value_type: &ValueType) -> bool {
        self.parsers.contains_key(&value_type.id())
    }

    /// Strict unit for `value_type`.
    ///
    /// `None` means the type is not registered and the caller falls back to
    /// the category of the field.
    pub fn resolve(
        &self,
        value_type: &ValueType,
        name: &str,
        raw: Option<&str>,
    ) -> Option<Result<Option<StrictEnumFilter>, FilterError>> {
        self.lookup(value_type)
            .map(|parser| parser.extract(name, raw))
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::SqlValue;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Colour {
        Red,
        DarkBlue,
    }

    impl FilterEnum for Colour {
        const TYPE_NAME: &'static str = "Colour";
        const VARIANTS: &'static [&'static str] = &["RED", "DARK_BLUE"];

        fn as_str(&self) -> &'static str {
            match self {
                Colour::Red => "RED",
                Colour::DarkBlue => "DARK_BLUE",
            }
        }

        fn from_name(name: &str) -> Option<Self> {
            match name {
                "RED" => Some(Colour::Red),
                "DARK_BLUE" => Some(Colour::DarkBlue),
                _ => None,
            }
        }
    }

    fn registry() -> EnumRegistry {
        EnumRegistry::new().with::<Colour>()
    }

    #[test]
    fn test_unregistered_type_falls_back() {
        let registry = registry();
        assert!(registry.lookup(&ValueType::of::<String>()).is_none());
        assert!(registry
            .resolve(&ValueType::of::<String>(), "colour", Some("RED"))
            .is_none());
    }

    #[test]
    fn test_valid_member_is_equality() {
        let filter = registry()
            .resolve(&ValueType::of::<Colour>(), "colour", Some("DARK_BLUE|not_RED"))
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(filter.type_name(), "Colour");
        let (sql, values) = filter.predicate("colour").unwrap().to_sql();
        assert_eq!(sql, "colour = ? OR colour <> ?");
        assert_eq!(
            values,
            vec![SqlValue::from("DARK_BLUE"), SqlValue::from("RED")]
        );
    }

    #[test]
    fn test_strict_parse_is_case_sensitive() {
        let error = registry()
            .resolve(&ValueType::of::<Colour>(), "colour", Some("RED|red"))
            .unwrap()
            .unwrap_err();
        assert_matches!(
            &error,
            FilterError::InvalidEnum { type_name: "Colour", field, value }
                if field == "colour" && value == "red"
        );
        assert_eq!(
            error.to_string(),
            "Invalid Colour format: Unable to parse the value 'red' as an Colour."
        );
    }

    #[test]
    fn test_null_is_accepted() {
        let filter = EnumParser::of::<Colour>()
            .extract("colour", Some("not_null"))
            .unwrap()
            .unwrap();
        assert_eq!(filter.predicate("colour").unwrap().to_string(), "colour IS NOT NULL");
    }

    #[test]
    fn test_empty_is_no_filter() {
        assert_eq!(EnumParser::of::<Colour>().extract("colour", Some("")).unwrap(), None);
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = EnumRegistry::new();
        registry.register::<Colour>().register::<Colour>();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&ValueType::of::<Colour>()));
        assert_eq!(Colour::from_name(Colour::DarkBlue.as_str()), Some(Colour::DarkBlue));
    }
}
