use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;
use warden_macros::FilterableEntity;

use super::{AccessControlType, ActionPermission, AuditFields, EntityPermission};
use crate::orm::FromSqlRow;
use crate::orm::decode::{get_enum, get_optional_uuid, get_uuid};

#[derive(FilterableEntity, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[filterable_entity(table = "users", default_sort = "login")]
pub struct User {
    #[filterable(type = "identifier", column = "usr_id")]
    pub id: Uuid,

    #[filterable(type = "text")]
    pub email: Option<String>,

    #[filterable(type = "text")]
    pub login: String,

    #[filterable(type = "text")]
    pub name: Option<String>,

    #[filterable(type = "text")]
    pub picture: Option<String>,

    #[serde(flatten)]
    #[filterable(flatten)]
    pub audit: AuditFields,
}

impl FromSqlRow for User {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: get_uuid(row, "usr_id")?,
            email: row.try_get("email")?,
            login: row.try_get("login")?,
            name: row.try_get("name")?,
            picture: row.try_get("picture")?,
            audit: AuditFields::from_row(row)?,
        })
    }
}

/// Effective permission of a user, direct or inherited
#[derive(FilterableEntity, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[filterable_entity(table = "users_permissions_view", default_sort = "usp_id")]
pub struct UserPermission {
    #[filterable(type = "token", column = "usp_id")]
    pub id: String,

    #[filterable(type = "identifier", column = "usr_id")]
    pub user_id: Uuid,

    #[filterable(type = "identifier", column = "per_id")]
    pub permission_id: Uuid,

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

impl FromSqlRow for UserPermission {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("usp_id")?,
            user_id: get_uuid(row, "usr_id")?,
            permission_id: get_uuid(row, "per_id")?,
            entity: get_enum(row, "entity")?,
            action: get_enum(row, "action")?,
            library_id: get_optional_uuid(row, "lib_id")?,
            audit: AuditFields::from_row(row)?,
        })
    }
}

/// Access controls a user belongs to, with the kind of each entry
#[derive(FilterableEntity, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[filterable_entity(table = "users_access_controls_view", default_sort = "usa_id")]
pub struct UserAccessControlView {
    #[filterable(type = "token", column = "usa_id")]
    pub id: String,

    #[filterable(type = "identifier", column = "usr_id")]
    pub user_id: Uuid,

    #[filterable(type = "text")]
    pub email: Option<String>,

    #[filterable(type = "text")]
    pub login: String,

    #[filterable(type = "text")]
    pub user_name: Option<String>,

    #[filterable(type = "identifier", column = "aco_id")]
    pub access_control_id: Uuid,

    #[filterable(type = "text")]
    pub access_control_name: String,

    #[filterable(type = "enum", name = "type", column = "type")]
    pub access_control_type: AccessControlType,
}

impl FromSqlRow for UserAccessControlView {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("usa_id")?,
            user_id: get_uuid(row, "usr_id")?,
            email: row.try_get("email")?,
            login: row.try_get("login")?,
            user_name: row.try_get("user_name")?,
            access_control_id: get_uuid(row, "aco_id")?,
            access_control_name: row.try_get("access_control_name")?,
            access_control_type: get_enum(row, "type")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{FilterCategory, FilterableEntity, discover};
    use crate::orm::DatabaseEntity;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_user_fields_include_audit_columns() {
        let descriptor = discover::<User>();
        let fields: Vec<_> = descriptor
            .fields()
            .iter()
            .map(|f| (f.name, f.column, f.category))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("id", "usr_id", FilterCategory::Identifier),
                ("email", "email", FilterCategory::Text),
                ("login", "login", FilterCategory::Text),
                ("name", "name", FilterCategory::Text),
                ("picture", "picture", FilterCategory::Text),
                ("insertDate", "insert_date", FilterCategory::Date),
                ("updateDate", "update_date", FilterCategory::Date),
            ]
        );
        assert_eq!(User::ENTITY_NAME, "User");
    }

    #[test]
    fn test_user_table() {
        assert_eq!(User::TABLE_NAME, "users");
        assert_eq!(User::DEFAULT_SORT, "login");
        assert_eq!(
            User::select_sql(),
            "SELECT usr_id, email, login, name, picture, insert_date, update_date FROM users"
        );
    }

    #[test]
    fn test_renamed_filter_key() {
        let descriptor = discover::<UserAccessControlView>();
        let field = descriptor.field("type").unwrap();
        assert_eq!(field.column, "type");
        assert!(field.value_type.is::<AccessControlType>());
        assert!(descriptor.field("accessControlType").is_none());
    }
}
