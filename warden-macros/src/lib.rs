//! Procedural macros for Warden
//!
//! This crate provides the declarative filter metadata used by the backend:
//!
//! - `#[derive(FilterableEntity)]` - Declare which attributes of an entity can be filtered
//! - `#[derive(FilterEnum)]` - Closed enumerations that filters parse strictly

mod entity;
mod enumeration;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derive filter metadata for an entity.
///
/// # Usage
///
/// ```ignore
/// #[derive(FilterableEntity)]
/// #[filterable_entity(table = "libraries", default_sort = "name")]
/// pub struct Library {
///     #[filterable(type = "identifier", column = "lib_id")]
///     pub id: Uuid,
///
///     #[filterable(type = "text")]
///     pub documentation_url: Option<String>,
///
///     // Mapped column, never filterable
///     #[filterable(column = "icon")]
///     pub icon: Option<String>,
///
///     // Splice the fields of another entity (shared audit columns)
///     #[filterable(flatten)]
///     pub audit: AuditFields,
/// }
/// ```
///
/// Filter keys default to the camelCase field name (`documentationUrl`),
/// columns to the field name itself. When `table` is given a
/// `DatabaseEntity` implementation is generated as well.
#[proc_macro_derive(FilterableEntity, attributes(filterable_entity, filterable))]
pub fn derive_filterable_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derive strict name parsing for a closed enumeration.
///
/// Variant names are exposed in SCREAMING_SNAKE_CASE (`ProjectTemplate` ->
/// `PROJECT_TEMPLATE`) unless renamed with `#[filter_enum(rename = "...")]`.
#[proc_macro_derive(FilterEnum, attributes(filter_enum))]
pub fn derive_filter_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    enumeration::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
