//! Query filter compiler
//!
//! Entities declare filterable fields with `#[derive(FilterableEntity)]`;
//! [`SpecificationBuilder`] turns a map of encoded filter values such as
//! `{"id": "5|7", "name": "lk_adm*"}` into a [`Predicate`] that plugs into
//! [`EntityQuery`](crate::orm::EntityQuery).

pub mod error;
pub mod field;
pub mod operator;
pub mod overrides;
pub mod parse;
pub mod predicate;
pub mod specification;
pub mod units;

pub use error::{ErrorDto, ErrorType, FilterError};
pub use field::{
    EntityDescriptor, FilterCategory, FilterField, FilterableEntity, ValueType, discover,
};
pub use operator::PredicateOperator;
pub use overrides::{EnumParser, EnumRegistry, FilterEnum, StrictEnumFilter};
pub use parse::ParsedValue;
pub use predicate::{CompareOp, Expr, Predicate};
pub use specification::{BoundFilter, SpecificationBuilder};
pub use units::{FieldFilter, PredicateFilter};
