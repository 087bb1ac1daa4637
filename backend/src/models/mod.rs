//! Access-control domain entities
//!
//! Each entity declares its filterable fields and backing table with
//! `#[derive(FilterableEntity)]`. Enumerations listed in
//! [`domain_registry`] are parsed strictly wherever they appear.

mod access_control;
mod audit;
mod library;
mod user;

pub use access_control::{
    AccessControl, AccessControlPermission, AccessControlTreeView, Permission,
};
pub use audit::AuditFields;
pub use library::{Library, LibraryTemplate};
pub use user::{User, UserAccessControlView, UserPermission};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use warden_macros::FilterEnum;

use crate::filters::EnumRegistry;

/// Kind of access control entry
#[derive(FilterEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessControlType {
    Role,
    Group,
    Scope,
}

/// Entity a permission applies to
#[derive(FilterEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityPermission {
    Admin,
    Project,
    ProjectTemplate,
    Diagram,
    DiagramTemplate,
    Component,
    ComponentTemplate,
    Library,
}

/// Action a permission grants
#[derive(FilterEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionPermission {
    Access,
    Create,
    Delete,
    Update,
}

/// Kind of library template; filtered leniently
#[derive(FilterEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LibraryTemplateType {
    Project,
    Diagram,
    Component,
}

static DOMAIN_REGISTRY: Lazy<EnumRegistry> = Lazy::new(|| {
    EnumRegistry::new()
        .with::<AccessControlType>()
        .with::<EntityPermission>()
        .with::<ActionPermission>()
});

/// Strictly parsed access-control enumerations
pub fn domain_registry() -> &'static EnumRegistry {
    &DOMAIN_REGISTRY
}
