use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use warden_macros::FilterableEntity;

use crate::orm::FromSqlRow;
use crate::orm::decode::{get_datetime, get_optional_datetime};

/// Timestamps shared by every persisted entity
#[derive(FilterableEntity, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFields {
    #[filterable(type = "date")]
    pub insert_date: NaiveDateTime,

    #[filterable(type = "date")]
    pub update_date: Option<NaiveDateTime>,
}

impl FromSqlRow for AuditFields {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            insert_date: get_datetime(row, "insert_date")?,
            update_date: get_optional_datetime(row, "update_date")?,
        })
    }
}
