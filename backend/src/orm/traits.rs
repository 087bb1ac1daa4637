//! Core traits for the ORM layer
//!
//! `DatabaseEntity` is implemented by `#[derive(FilterableEntity)]` when a
//! table is declared; `DatabaseFilter` is implemented by compiled filter
//! predicates.

use chrono::NaiveDateTime;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use crate::db::sqlite_helpers::{bool_to_int, datetime_to_str, uuid_to_str};

/// Metadata about a database entity (table).
pub trait DatabaseEntity: Sized + Send + Sync {
    /// The SQL table name (e.g., "users")
    const TABLE_NAME: &'static str;

    /// Default sort column for list queries (e.g., "login")
    const DEFAULT_SORT: &'static str;

    /// Default sort direction
    const DEFAULT_SORT_DIR: &'static str = "ASC";

    /// List of all column names in the table
    fn column_names() -> Vec<&'static str>;

    /// Build a SELECT query for all columns
    fn select_sql() -> String {
        let columns = Self::column_names().join(", ");
        format!("SELECT {} FROM {}", columns, Self::TABLE_NAME)
    }
}

/// Trait for applying filters to a SQL query.
pub trait DatabaseFilter: Send + Sync {
    /// WHERE clause fragments (with `?` placeholders) and the values to bind.
    fn to_sql_conditions(&self) -> (Vec<String>, Vec<SqlValue>);

    /// Check if the filter has any conditions
    fn is_empty(&self) -> bool;
}

/// Trait for decoding a database row into an entity.
pub trait FromSqlRow: Sized {
    /// Decode a SQLite row into this entity type
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error>;
}

/// Sort direction for ORDER BY clauses.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum OrderDirection {
    /// Ascending order (A-Z, 1-9, oldest-newest)
    #[default]
    Asc,
    /// Descending order (Z-A, 9-1, newest-oldest)
    Desc,
}

impl OrderDirection {
    /// Convert to SQL order string
    pub fn to_sql(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// Represents a SQL value that can be bound to a query.
///
/// Used by filters to collect values for parameterized queries.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Stored as hyphenated TEXT
    Uuid(Uuid),
    /// Stored as `YYYY-MM-DD HH:MM:SS` TEXT
    Timestamp(NaiveDateTime),
    Null,
}

impl SqlValue {
    /// Bind this value to a sqlx query
    pub fn bind_to_query<'q>(
        &'q self,
        query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    ) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
        match self {
            SqlValue::String(s) => query.bind(s.as_str()),
            SqlValue::Int(i) => query.bind(*i),
            SqlValue::Float(f) => query.bind(*f),
            SqlValue::Bool(b) => query.bind(bool_to_int(*b)),
            SqlValue::Uuid(id) => query.bind(uuid_to_str(*id)),
            SqlValue::Timestamp(dt) => query.bind(datetime_to_str(*dt)),
            SqlValue::Null => query.bind(None::<String>),
        }
    }

    /// Bind this value to a scalar query (e.g. COUNT)
    pub fn bind_to_scalar<'q, O: Send + Unpin>(
        &'q self,
        query: sqlx::query::QueryScalar<'q, sqlx::Sqlite, O, sqlx::sqlite::SqliteArguments<'q>>,
    ) -> sqlx::query::QueryScalar<'q, sqlx::Sqlite, O, sqlx::sqlite::SqliteArguments<'q>> {
        match self {
            SqlValue::String(s) => query.bind(s.as_str()),
            SqlValue::Int(i) => query.bind(*i),
            SqlValue::Float(f) => query.bind(*f),
            SqlValue::Bool(b) => query.bind(bool_to_int(*b)),
            SqlValue::Uuid(id) => query.bind(uuid_to_str(*id)),
            SqlValue::Timestamp(dt) => query.bind(datetime_to_str(*dt)),
            SqlValue::Null => query.bind(None::<String>),
        }
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::String(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::String(value.to_string())
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<Uuid> for SqlValue {
    fn from(value: Uuid) -> Self {
        SqlValue::Uuid(value)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(value: NaiveDateTime) -> Self {
        SqlValue::Timestamp(value)
    }
}
