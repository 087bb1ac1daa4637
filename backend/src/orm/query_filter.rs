//! Pagination and sorting parameters
//!
//! Controllers receive one flat query-string map. The reserved keys `page`,
//! `count`, `order` and `sort` are split off into a [`QueryFilter`]; every
//! other key is an encoded field filter for the compiler.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::traits::OrderDirection;

pub const DEFAULT_RESOURCE_SIZE: i64 = 10;
pub const MINIMUM_RESOURCE_SIZE: i64 = 1;
pub const MAXIMUM_RESOURCE_SIZE: i64 = 200;
/// Largest page whose offset still fits in an `i64`
pub const MAXIMUM_PAGE: i64 = i64::MAX / MAXIMUM_RESOURCE_SIZE;

const RESERVED_KEYS: [&str; 4] = ["page", "count", "order", "sort"];

/// Errors raised while reading pagination parameters or applying them
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Invalid value '{value}' for query parameter '{key}'")]
    InvalidParameter { key: &'static str, value: String },

    #[error("Invalid sort direction '{0}', expected 'asc' or 'desc'")]
    InvalidSort(String),

    #[error("Unknown sort field '{0}'")]
    UnknownSortField(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilter {
    pub page: Option<i64>,
    pub count: Option<i64>,
    /// Filter key or column to sort on
    pub order: Option<String>,
    /// `asc` or `desc`
    pub sort: Option<String>,
}

impl QueryFilter {
    /// Split reserved keys off `params`, returning the remaining field filters
    pub fn from_params(
        mut params: HashMap<String, String>,
    ) -> Result<(Self, HashMap<String, String>), QueryError> {
        let page = params.remove("page").map(|v| parse_number("page", v)).transpose()?;
        let count = params.remove("count").map(|v| parse_number("count", v)).transpose()?;
        let order = params.remove("order").filter(|v| !v.is_empty());
        let sort = params.remove("sort").filter(|v| !v.is_empty());

        if let Some(sort) = &sort {
            if sort != "asc" && sort != "desc" {
                return Err(QueryError::InvalidSort(sort.clone()));
            }
        }

        Ok((
            Self {
                page,
                count,
                order,
                sort,
            },
            params,
        ))
    }

    pub fn is_reserved(key: &str) -> bool {
        RESERVED_KEYS.contains(&key)
    }

    /// Zero-based page, clamped to `0..=MAXIMUM_PAGE`
    pub fn computed_page(&self) -> i64 {
        self.page.unwrap_or(0).clamp(0, MAXIMUM_PAGE)
    }

    /// Page size clamped to the allowed range
    pub fn computed_page_size(&self) -> i64 {
        self.count
            .unwrap_or(DEFAULT_RESOURCE_SIZE)
            .clamp(MINIMUM_RESOURCE_SIZE, MAXIMUM_RESOURCE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.computed_page() * self.computed_page_size()
    }

    pub fn is_ascendant_sort(&self) -> bool {
        self.sort
            .as_deref()
            .is_some_and(|sort| sort.eq_ignore_ascii_case("asc"))
    }

    /// Requested direction, or `default` when `sort` is absent
    pub fn direction(&self, default: OrderDirection) -> OrderDirection {
        match self.sort.as_deref() {
            Some(sort) if !sort.trim().is_empty() => {
                if self.is_ascendant_sort() {
                    OrderDirection::Asc
                } else {
                    OrderDirection::Desc
                }
            }
            _ => default,
        }
    }
}

fn parse_number(key: &'static str, value: String) -> Result<i64, QueryError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| QueryError::InvalidParameter { key, value })
}
