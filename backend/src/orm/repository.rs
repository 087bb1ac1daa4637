//! Filtered, paginated entity lookups
//!
//! Glue between a controller's raw query-string map and [`EntityQuery`]:
//! reserved keys become a [`QueryFilter`], the rest is compiled into a
//! predicate, and one page of entities is fetched along with the total.
//!
//! ```rust,ignore
//! let params = HashMap::from([
//!     ("login".to_string(), "lk_adm*".to_string()),
//!     ("count".to_string(), "20".to_string()),
//! ]);
//! let page = find_page::<User>(&pool, &SpecificationBuilder::new(), params).await?;
//! ```

use std::collections::HashMap;

use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;

use super::builder::EntityQuery;
use super::query_filter::{QueryError, QueryFilter};
use super::traits::{DatabaseEntity, FromSqlRow};
use crate::filters::{FilterError, FilterableEntity, SpecificationBuilder};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<E> {
    pub items: Vec<E>,
    /// Matching rows across all pages
    pub total: i64,
    pub page: i64,
    pub size: i64,
}

/// Fetch the page of `E` described by `params`.
pub async fn find_page<E>(
    pool: &SqlitePool,
    builder: &SpecificationBuilder,
    params: HashMap<String, String>,
) -> Result<Page<E>, RepositoryError>
where
    E: DatabaseEntity + FilterableEntity + FromSqlRow,
{
    let (page, filters) = QueryFilter::from_params(params)?;
    let predicate = builder.compile::<E>(&filters)?;

    let query = EntityQuery::<E>::new().filter(&predicate).paginate(&page)?;
    let total = query.count(pool).await?;
    let items = query.fetch_all(pool).await?;

    Ok(Page {
        items,
        total,
        page: page.computed_page(),
        size: page.computed_page_size(),
    })
}

/// Count the rows of `E` matching `filters`.
pub async fn count_matching<E>(
    pool: &SqlitePool,
    builder: &SpecificationBuilder,
    filters: &HashMap<String, String>,
) -> Result<i64, RepositoryError>
where
    E: DatabaseEntity + FilterableEntity,
{
    let predicate = builder.compile::<E>(filters)?;
    let total = EntityQuery::<E>::new().filter(&predicate).count(pool).await?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_serialization_failure_is_not_a_filter_error() {
        let cause = serde_json::from_str::<i64>("not json").unwrap_err();
        let error = RepositoryError::from(cause);
        assert_matches!(error, RepositoryError::Serialize(_));
        assert!(error.to_string().starts_with("Serialization error: "));
    }

    #[test]
    fn test_filter_failure_keeps_its_message() {
        let error = RepositoryError::from(FilterError::WrongFilterOperator {
            field: "insertDate".to_string(),
            value: "xx2020-01-01".to_string(),
        });
        assert_matches!(error, RepositoryError::Filter(ref e) if e.field() == Some("insertDate"));
        assert_eq!(
            error.to_string(),
            "Field contains a wrong operator: 'xx2020-01-01' for field 'insertDate'"
        );
    }
}
