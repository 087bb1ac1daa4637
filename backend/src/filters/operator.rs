//! Operator vocabulary for encoded filter values

use std::fmt;

/// Comparison operators understood by the filter grammar.
///
/// `Inferior`, `Superior` and `Between` are only produced by date filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateOperator {
    /// `eq`
    Equals,
    /// `lt`
    Inferior,
    /// `gt`
    Superior,
    /// `bt`
    Between,
    /// `null`
    Null,
    /// `lk_` (a prefix, not a standalone token)
    Like,
}

impl PredicateOperator {
    pub const ALL: [PredicateOperator; 6] = [
        PredicateOperator::Equals,
        PredicateOperator::Inferior,
        PredicateOperator::Superior,
        PredicateOperator::Between,
        PredicateOperator::Null,
        PredicateOperator::Like,
    ];

    /// Textual token of the operator
    pub fn token(&self) -> &'static str {
        match self {
            PredicateOperator::Equals => "eq",
            PredicateOperator::Inferior => "lt",
            PredicateOperator::Superior => "gt",
            PredicateOperator::Between => "bt",
            PredicateOperator::Null => "null",
            PredicateOperator::Like => "lk_",
        }
    }

    /// Case-insensitive exact match against the known tokens
    pub fn is_valid(token: &str) -> bool {
        Self::resolve(token).is_some()
    }

    /// Operator matching `token`, if any
    pub fn resolve(token: &str) -> Option<PredicateOperator> {
        Self::ALL
            .into_iter()
            .find(|operator| operator.token().eq_ignore_ascii_case(token))
    }

    /// Strip the LIKE prefix from `literal` (case-insensitive).
    ///
    /// Returns `None` when the literal does not start with `lk_`.
    pub fn strip_like_prefix(literal: &str) -> Option<&str> {
        strip_prefix_ignore_case(literal, PredicateOperator::Like.token())
    }
}

impl fmt::Display for PredicateOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// ASCII case-insensitive `str::strip_prefix`
pub(crate) fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&value[prefix.len()..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid() {
        assert!(PredicateOperator::is_valid("eq"));
        assert!(PredicateOperator::is_valid("LT"));
        assert!(PredicateOperator::is_valid("Gt"));
        assert!(PredicateOperator::is_valid("bt"));
        assert!(PredicateOperator::is_valid("NULL"));
        assert!(PredicateOperator::is_valid("lk_"));
        assert!(!PredicateOperator::is_valid("lk"));
        assert!(!PredicateOperator::is_valid("ne"));
        assert!(!PredicateOperator::is_valid(""));
    }

    #[test]
    fn test_resolve() {
        assert_eq!(PredicateOperator::resolve("eq"), Some(PredicateOperator::Equals));
        assert_eq!(PredicateOperator::resolve("LT"), Some(PredicateOperator::Inferior));
        assert_eq!(PredicateOperator::resolve("gt"), Some(PredicateOperator::Superior));
        assert_eq!(PredicateOperator::resolve("Bt"), Some(PredicateOperator::Between));
        assert_eq!(PredicateOperator::resolve("null"), Some(PredicateOperator::Null));
        assert_eq!(PredicateOperator::resolve("LK_"), Some(PredicateOperator::Like));
        assert_eq!(PredicateOperator::resolve("lk_test"), None);
        assert_eq!(PredicateOperator::resolve("aa"), None);
    }

    #[test]
    fn test_like_prefix_is_checked_separately() {
        assert_eq!(PredicateOperator::strip_like_prefix("lk_a*b"), Some("a*b"));
        assert_eq!(PredicateOperator::strip_like_prefix("LK_test"), Some("test"));
        assert_eq!(PredicateOperator::strip_like_prefix("lk_"), Some(""));
        assert_eq!(PredicateOperator::strip_like_prefix("lk"), None);
        assert_eq!(PredicateOperator::strip_like_prefix("test"), None);
    }

    #[test]
    fn test_strip_prefix_handles_multibyte_values() {
        assert_eq!(strip_prefix_ignore_case("é", "not_"), None);
        assert_eq!(strip_prefix_ignore_case("noté_", "not_"), None);
        assert_eq!(strip_prefix_ignore_case("NOT_é", "not_"), Some("é"));
    }
}
