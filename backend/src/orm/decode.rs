//! Column decoding for SQLite TEXT encodings
//!
//! UUIDs, timestamps and enumerations are stored as TEXT; these helpers
//! decode them inside `FromSqlRow` implementations and report failures as
//! `sqlx::Error::ColumnDecode`.

use chrono::NaiveDateTime;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use crate::db::sqlite_helpers::{str_to_datetime, str_to_uuid};
use crate::filters::FilterEnum;

fn decode_error(column: &str, source: anyhow::Error) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: source.into(),
    }
}

pub fn get_uuid(row: &SqliteRow, column: &str) -> Result<Uuid, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    str_to_uuid(&raw).map_err(|e| decode_error(column, e))
}

pub fn get_optional_uuid(row: &SqliteRow, column: &str) -> Result<Option<Uuid>, sqlx::Error> {
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|raw| str_to_uuid(&raw).map_err(|e| decode_error(column, e)))
        .transpose()
}

pub fn get_datetime(row: &SqliteRow, column: &str) -> Result<NaiveDateTime, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    str_to_datetime(&raw).map_err(|e| decode_error(column, e))
}

pub fn get_optional_datetime(
    row: &SqliteRow,
    column: &str,
) -> Result<Option<NaiveDateTime>, sqlx::Error> {
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|raw| str_to_datetime(&raw).map_err(|e| decode_error(column, e)))
        .transpose()
}

/// Enumeration stored by member name
pub fn get_enum<T: FilterEnum>(row: &SqliteRow, column: &str) -> Result<T, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    T::from_name(&raw).ok_or_else(|| {
        decode_error(
            column,
            anyhow::anyhow!("'{}' is not a valid {}", raw, T::TYPE_NAME),
        )
    })
}
