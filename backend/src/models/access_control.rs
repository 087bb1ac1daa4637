use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;
use warden_macros::FilterableEntity;

use super::{AccessControlType, ActionPermission, AuditFields, EntityPermission};
use crate::orm::FromSqlRow;
use crate::orm::decode::{get_enum, get_optional_uuid, get_uuid};

/// Role, group or scope
#[derive(FilterableEntity, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[filterable_entity(table = "access_controls", default_sort = "name")]
pub struct AccessControl {
    #[filterable(type = "identifier", column = "aco_id")]
    pub id: Uuid,

    #[filterable(type = "text")]
    pub name: String,

    #[serde(rename = "type")]
    #[filterable(type = "enum", name = "type", column = "type")]
    pub kind: AccessControlType,

    #[serde(flatten)]
    #[filterable(flatten)]
    pub audit: AuditFields,
}

impl FromSqlRow for AccessControl {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: get_uuid(row, "aco_id")?,
            name: row.try_get("name")?,
            kind: get_enum(row, "type")?,
            audit: AuditFields::from_row(row)?,
        })
    }
}

#[derive(FilterableEntity, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[filterable_entity(table = "permissions", default_sort = "entity")]
pub struct Permission {
    #[filterable(type = "identifier", column = "per_id")]
    pub id: Uuid,

    #[filterable(type = "enum")]
    pub entity: EntityPermission,

    #[filterable(type = "enum")]
    pub action: ActionPermission,

    #[filterable(type = "identifier", column = "lib_id")]
    pub library_id: Option<Uuid>,

    #[serde(flatten)]
    #[filterable(flatten)]
    pub audit: AuditFields,
}

impl FromSqlRow for Permission {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: get_uuid(row, "per_id")?,
            entity: get_enum(row, "entity")?,
            action: get_enum(row, "action")?,
            library_id: get_optional_uuid(row, "lib_id")?,
            audit: AuditFields::from_row(row)?,
        })
    }
}

/// Permission granted to an access control
#[derive(FilterableEntity, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[filterable_entity(table = "access_controls_permissions", default_sort = "pac_id")]
pub struct AccessControlPermission {
    #[filterable(type = "number", column = "pac_id")]
    pub id: i64,

    #[filterable(type = "identifier", column = "aco_id")]
    pub access_control_id: Uuid,

    #[filterable(type = "identifier", column = "per_id")]
    pub permission_id: Uuid,

    #[serde(flatten)]
    #[filterable(flatten)]
    pub audit: AuditFields,
}

impl FromSqlRow for AccessControlPermission {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("pac_id")?,
            access_control_id: get_uuid(row, "aco_id")?,
            permission_id: get_uuid(row, "per_id")?,
            audit: AuditFields::from_row(row)?,
        })
    }
}

/// Parent/child links between access controls, direct or transitive
#[derive(FilterableEntity, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[filterable_entity(table = "access_controls_tree_view", default_sort = "name")]
pub struct AccessControlTreeView {
    #[filterable(type = "token", column = "aca_id")]
    pub id: String,

    #[filterable(type = "identifier", column = "aco_id")]
    pub access_control_id: Uuid,

    #[filterable(type = "text", column = "type")]
    pub access_control_type: String,

    #[filterable(type = "text", column = "name")]
    pub access_control_name: String,

    #[filterable(type = "identifier", column = "parent")]
    pub parent_access_control_id: Uuid,

    #[filterable(type = "text", column = "parent_name")]
    pub parent_access_control_name: String,

    #[filterable(type = "text", column = "parent_type")]
    pub parent_access_control_type: String,

    #[filterable(type = "boolean", column = "direct")]
    pub is_direct: bool,
}

impl FromSqlRow for AccessControlTreeView {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("aca_id")?,
            access_control_id: get_uuid(row, "aco_id")?,
            access_control_type: row.try_get("type")?,
            access_control_name: row.try_get("name")?,
            parent_access_control_id: get_uuid(row, "parent")?,
            parent_access_control_name: row.try_get("parent_name")?,
            parent_access_control_type: row.try_get("parent_type")?,
            is_direct: row.try_get("direct")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{FilterError, SpecificationBuilder};
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn filters(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_access_control_type_is_strict() {
        let builder = SpecificationBuilder::new();
        let error = builder
            .compile::<AccessControl>(&filters(&[("type", "bad")]))
            .unwrap_err();
        assert_matches!(
            &error,
            FilterError::InvalidEnum { type_name: "AccessControlType", field, value }
                if field == "type" && value == "bad"
        );
        assert_eq!(
            error.to_string(),
            "Invalid AccessControlType format: Unable to parse the value 'bad' as an AccessControlType."
        );

        let predicate = builder
            .compile::<AccessControl>(&filters(&[("type", "ROLE|GROUP")]))
            .unwrap();
        assert_eq!(predicate.to_string(), "type = ? OR type = ?");
    }

    #[test]
    fn test_permission_entity_and_action() {
        let builder = SpecificationBuilder::new();
        let predicate = builder
            .compile::<Permission>(&filters(&[
                ("entity", "PROJECT_TEMPLATE"),
                ("action", "not_DELETE"),
                ("libraryId", "null"),
            ]))
            .unwrap();
        assert_eq!(
            predicate.to_string(),
            "entity = ? AND action <> ? AND lib_id IS NULL"
        );

        let error = builder
            .compile::<Permission>(&filters(&[("action", "READ")]))
            .unwrap_err();
        assert_eq!(error.type_name(), Some("ActionPermission"));
    }

    #[test]
    fn test_tree_view_direct_flag() {
        let predicate = SpecificationBuilder::new()
            .compile::<AccessControlTreeView>(&filters(&[
                ("isDirect", "true"),
                ("accessControlName", "lk_adm*"),
            ]))
            .unwrap();
        assert_eq!(predicate.to_string(), "UPPER(name) LIKE ? AND direct = ?");
    }
}
