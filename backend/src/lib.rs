//! Query-filter compiler for the multi-tenant access-control backend
//!
//! Controllers hand a flat `field -> encoded value` map to
//! [`filters::SpecificationBuilder`], which compiles it into a typed
//! predicate for one of the [`models`]; [`orm::EntityQuery`] renders the
//! predicate as parameterized SQLite.

// Derive output refers to `::warden::...`, which must also resolve in here.
extern crate self as warden;

pub mod cli;
pub mod config;
pub mod db;
pub mod filters;
pub mod models;
pub mod orm;
