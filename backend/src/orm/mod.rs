//! ORM layer
//!
//! Entities get `DatabaseEntity` from `#[derive(FilterableEntity)]` when a
//! table is declared and implement `FromSqlRow` by hand. Compiled filter
//! predicates plug into [`EntityQuery`] through `DatabaseFilter`.

mod builder;
pub mod decode;
mod query_filter;
mod repository;
mod traits;

pub use builder::*;
pub use query_filter::*;
pub use repository::*;
pub use traits::*;
