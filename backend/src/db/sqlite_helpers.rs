//! SQLite helper utilities for type conversion
//!
//! SQLite doesn't natively support UUIDs or timestamps like PostgreSQL.
//! This module provides utilities to convert between Rust types and SQLite-compatible formats.

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use uuid::Uuid;

// ============================================================================
// UUID Helpers
// ============================================================================

/// Convert a UUID to a SQLite-compatible string
#[inline]
pub fn uuid_to_str(id: Uuid) -> String {
    id.to_string()
}

/// Parse a SQLite string back to a UUID
#[inline]
pub fn str_to_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| anyhow!("Invalid UUID '{}': {}", s, e))
}

// ============================================================================
// Timestamp Helpers (stored as TEXT in SQLite)
// ============================================================================

/// Format used for timestamp columns, matching SQLite's `datetime()`
pub const SQLITE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Convert a timestamp to its SQLite TEXT form
#[inline]
pub fn datetime_to_str(dt: NaiveDateTime) -> String {
    dt.format(SQLITE_DATETIME_FORMAT).to_string()
}

/// Parse a timestamp.
///
/// Accepts SQLite's `YYYY-MM-DD HH:MM:SS`, RFC 3339 (converted to UTC), and
/// a bare `YYYY-MM-DD` (midnight).
pub fn str_to_datetime(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, SQLITE_DATETIME_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.naive_utc()))
        .or_else(|_| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(|date| date.and_time(chrono::NaiveTime::MIN))
        })
        .map_err(|e| anyhow!("Invalid datetime '{}': {}", s, e))
}

// ============================================================================
// Boolean Helpers (SQLite uses 0/1 integers)
// ============================================================================

/// Convert bool to SQLite integer (0 or 1)
#[inline]
pub fn bool_to_int(b: bool) -> i32 {
    if b { 1 } else { 0 }
}
