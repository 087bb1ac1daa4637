use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;
use warden_macros::FilterableEntity;

use super::{AuditFields, LibraryTemplateType};
use crate::orm::FromSqlRow;
use crate::orm::decode::{get_enum, get_uuid};

#[derive(FilterableEntity, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[filterable_entity(table = "libraries", default_sort = "name")]
pub struct Library {
    #[filterable(type = "identifier", column = "lib_id")]
    pub id: Uuid,

    #[filterable(type = "text")]
    pub url: Option<String>,

    #[filterable(type = "text")]
    pub documentation_url: Option<String>,

    #[filterable(type = "text")]
    pub name: String,

    #[filterable(type = "text")]
    pub version: String,

    #[filterable(type = "text")]
    pub maintainer: Option<String>,

    #[filterable(type = "text")]
    pub description: Option<String>,

    pub icon: Option<String>,

    #[serde(flatten)]
    #[filterable(flatten)]
    pub audit: AuditFields,
}

impl FromSqlRow for Library {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: get_uuid(row, "lib_id")?,
            url: row.try_get("url")?,
            documentation_url: row.try_get("documentation_url")?,
            name: row.try_get("name")?,
            version: row.try_get("version")?,
            maintainer: row.try_get("maintainer")?,
            description: row.try_get("description")?,
            icon: row.try_get("icon")?,
            audit: AuditFields::from_row(row)?,
        })
    }
}

/// Template shipped by a library
#[derive(FilterableEntity, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[filterable_entity(table = "library_templates", default_sort = "name")]
pub struct LibraryTemplate {
    #[filterable(type = "identifier", column = "lit_id")]
    pub id: Uuid,

    #[filterable(type = "identifier", column = "lib_id")]
    pub library_id: Uuid,

    #[filterable(type = "text")]
    pub documentation_url: Option<String>,

    #[filterable(type = "text")]
    pub name: String,

    #[serde(rename = "type")]
    #[filterable(type = "enum", name = "type", column = "type")]
    pub kind: LibraryTemplateType,

    #[filterable(type = "text")]
    pub description: Option<String>,

    pub base_path: Option<String>,

    #[filterable(type = "text")]
    pub plugins: Option<String>,

    pub icon: Option<String>,

    #[serde(flatten)]
    #[filterable(flatten)]
    pub audit: AuditFields,
}

impl FromSqlRow for LibraryTemplate {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: get_uuid(row, "lit_id")?,
            library_id: get_uuid(row, "lib_id")?,
            documentation_url: row.try_get("documentation_url")?,
            name: row.try_get("name")?,
            kind: get_enum(row, "type")?,
            description: row.try_get("description")?,
            base_path: row.try_get("base_path")?,
            plugins: row.try_get("plugins")?,
            icon: row.try_get("icon")?,
            audit: AuditFields::from_row(row)?,
        })
    }
}
