//! SQL query builder
//!
//! Builds parameterized SELECT and COUNT queries for a `DatabaseEntity`,
//! with compiled filter predicates, sorting and pagination.

use std::marker::PhantomData;

use sqlx::SqlitePool;

use super::query_filter::{QueryError, QueryFilter};
use super::traits::{DatabaseEntity, DatabaseFilter, FromSqlRow, OrderDirection, SqlValue};
use crate::filters::{FilterableEntity, discover};

/// A query builder for database entities.
///
/// Placeholders in added conditions are renumbered to `?1`, `?2`, ... in
/// the order their values are bound.
pub struct EntityQuery<E> {
    _phantom: PhantomData<E>,
    where_clauses: Vec<String>,
    values: Vec<SqlValue>,
    order_by: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
    param_counter: usize,
}

impl<E: DatabaseEntity + FilterableEntity> EntityQuery<E> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
            where_clauses: Vec::new(),
            values: Vec::new(),
            order_by: None,
            limit: None,
            offset: None,
            param_counter: 0,
        }
    }

    /// Add a filter to the query.
    pub fn filter<F: DatabaseFilter>(mut self, filter: &F) -> Self {
        if !filter.is_empty() {
            let (conditions, values) = filter.to_sql_conditions();
            for condition in conditions {
                let rewritten = self.rewrite_params(&condition);
                self.where_clauses.push(rewritten);
            }
            self.values.extend(values);
        }
        self
    }

    /// Sort on `field`, given as a filter key or a mapped column.
    pub fn order_by(mut self, field: &str, direction: OrderDirection) -> Result<Self, QueryError> {
        let column = Self::resolve_column(field)
            .ok_or_else(|| QueryError::UnknownSortField(field.to_string()))?;
        self.order_by = Some(format!("{} {}", column, direction.to_sql()));
        Ok(self)
    }

    /// Add default sorting if no order is specified.
    pub fn default_order(mut self) -> Self {
        if self.order_by.is_none() {
            self.order_by = Some(format!("{} {}", E::DEFAULT_SORT, E::DEFAULT_SORT_DIR));
        }
        self
    }

    /// Apply page, size and ordering from a [`QueryFilter`].
    pub fn paginate(mut self, page: &QueryFilter) -> Result<Self, QueryError> {
        let default_direction = if E::DEFAULT_SORT_DIR.eq_ignore_ascii_case("DESC") {
            OrderDirection::Desc
        } else {
            OrderDirection::Asc
        };
        let direction = page.direction(default_direction);
        let field = page.order.as_deref().unwrap_or(E::DEFAULT_SORT);
        self = self.order_by(field, direction)?;

        self.limit = Some(page.computed_page_size());
        self.offset = Some(page.offset());
        Ok(self)
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    fn resolve_column(field: &str) -> Option<&'static str> {
        if let Some(column) = E::column_names().into_iter().find(|column| *column == field) {
            return Some(column);
        }
        discover::<E>().field(field).map(|filter_field| filter_field.column)
    }

    /// Number every bare `?` placeholder sequentially.
    fn rewrite_params(&mut self, condition: &str) -> String {
        let mut result = String::with_capacity(condition.len() + 8);
        let mut chars = condition.chars().peekable();
        while let Some(c) = chars.next() {
            result.push(c);
            if c == '?' && !chars.peek().is_some_and(|next| next.is_ascii_digit()) {
                self.param_counter += 1;
                result.push_str(&self.param_counter.to_string());
            }
        }
        result
    }

    /// Conditions are parenthesised once there is more than one
    fn where_sql(&self) -> String {
        match self.where_clauses.as_slice() {
            [] => String::new(),
            [single] => format!(" WHERE {}", single),
            clauses => {
                let grouped: Vec<String> = clauses.iter().map(|c| format!("({})", c)).collect();
                format!(" WHERE {}", grouped.join(" AND "))
            }
        }
    }

    /// Build the SQL query string.
    pub fn build_sql(&self) -> String {
        let mut sql = E::select_sql();
        sql.push_str(&self.where_sql());

        if let Some(ref order) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        if let Some(offset) = self.offset {
            if offset > 0 {
                sql.push_str(&format!(" OFFSET {}", offset));
            }
        }

        sql
    }

    /// Build a COUNT query string.
    pub fn build_count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM {}{}", E::TABLE_NAME, self.where_sql())
    }

    /// Values in bind order
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Execute a COUNT query, ignoring pagination.
    pub async fn count(&self, pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let sql = self.build_count_sql();
        tracing::debug!(sql = %sql, "Executing count query");

        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for value in &self.values {
            query = value.bind_to_scalar(query);
        }

        query.fetch_one(pool).await
    }
}

impl<E: DatabaseEntity + FilterableEntity + FromSqlRow> EntityQuery<E> {
    /// Execute the query and return all matching entities.
    pub async fn fetch_all(self, pool: &SqlitePool) -> Result<Vec<E>, sqlx::Error> {
        let sql = self.build_sql();
        tracing::debug!(sql = %sql, "Executing entity query");

        let mut query = sqlx::query(&sql);
        for value in &self.values {
            query = value.bind_to_query(query);
        }

        let rows = query.fetch_all(pool).await?;
        rows.iter().map(E::from_row).collect()
    }

    /// Execute the query and return the first matching entity.
    pub async fn fetch_one(self, pool: &SqlitePool) -> Result<Option<E>, sqlx::Error> {
        let sql = self.build_sql();
        tracing::debug!(sql = %sql, "Executing entity query (one)");

        let mut query = sqlx::query(&sql);
        for value in &self.values {
            query = value.bind_to_query(query);
        }

        match query.fetch_optional(pool).await? {
            Some(row) => Ok(Some(E::from_row(&row)?)),
            None => Ok(None),
        }
    }
}

impl<E: DatabaseEntity + FilterableEntity> Default for EntityQuery<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{Expr, Predicate};
    use crate::models::User;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_placeholders_are_numbered_across_filters() {
        let first = Predicate::or(vec![
            Predicate::equal(Expr::column("login"), "a", false),
            Predicate::equal(Expr::column("login"), "b", false),
        ]);
        let second = Predicate::in_list(
            Expr::column("name"),
            vec![SqlValue::from("x"), SqlValue::from("y")],
            true,
        );
        let query = EntityQuery::<User>::new().filter(&first).filter(&second);
        assert_eq!(
            query.build_count_sql(),
            "SELECT COUNT(*) FROM users WHERE (login = ?1 OR login = ?2) AND (name NOT IN (?3, ?4))"
        );
        assert_eq!(query.values().len(), 4);
    }

    #[test]
    fn test_single_filter_is_not_wrapped() {
        let predicate = Predicate::like(Expr::column("login").upper(), "A%", false);
        let query = EntityQuery::<User>::new().filter(&predicate);
        assert_eq!(
            query.build_count_sql(),
            "SELECT COUNT(*) FROM users WHERE UPPER(login) LIKE ?1"
        );
    }

    #[test]
    fn test_true_predicate_adds_no_clause() {
        let query = EntityQuery::<User>::new().filter(&Predicate::True);
        assert_eq!(query.build_count_sql(), "SELECT COUNT(*) FROM users");
    }

    #[test]
    fn test_paginate_resolves_filter_keys() {
        let page = QueryFilter {
            page: Some(2),
            count: Some(5),
            order: Some("insertDate".to_string()),
            sort: Some("desc".to_string()),
        };
        let sql = EntityQuery::<User>::new().paginate(&page).unwrap().build_sql();
        assert!(sql.ends_with("FROM users ORDER BY insert_date DESC LIMIT 5 OFFSET 10"));
    }

    #[test]
    fn test_paginate_defaults() {
        let sql = EntityQuery::<User>::new()
            .paginate(&QueryFilter::default())
            .unwrap()
            .build_sql();
        assert!(sql.ends_with("FROM users ORDER BY login ASC LIMIT 10"));
    }

    #[test]
    fn test_paginate_clamps_huge_page() {
        let page = QueryFilter {
            page: Some(i64::MAX),
            count: Some(200),
            ..Default::default()
        };
        let sql = EntityQuery::<User>::new().paginate(&page).unwrap().build_sql();
        assert!(sql.ends_with(&format!(" LIMIT 200 OFFSET {}", (i64::MAX / 200) * 200)));
    }

    #[test]
    fn test_unknown_sort_field() {
        let page = QueryFilter {
            order: Some("password; DROP TABLE users".to_string()),
            ..Default::default()
        };
        assert!(EntityQuery::<User>::new().paginate(&page).is_err());
    }
}
