//! Persistence provider abstraction
//!
//! The DAL talks to the relational backend only through [`Provider`]. Rows
//! are exchanged as JSON objects keyed by stored column name; the provider
//! owns `id`, `created_at` and `updated_at`.

mod memory;
mod postgres;

pub use memory::MemoryProvider;
pub use postgres::PgProvider;

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

/// A stored row, keyed by column name
pub type Row = serde_json::Map<String, Value>;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Malformed row returned by provider: {0}")]
    MalformedRow(String),
}

/// Conjunction of column equalities
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Row,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `column = value`
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(column.into(), value.into());
        self
    }

    pub fn conditions(&self) -> &Row {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Whether `row` satisfies every condition
    pub fn matches(&self, row: &Row) -> bool {
        self.conditions
            .iter()
            .all(|(column, expected)| row.get(column).unwrap_or(&Value::Null) == expected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectQuery {
    pub filter: Filter,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

/// Relational backend consumed by the DAL.
///
/// Every call is one independent, atomic round-trip. There is no
/// cross-call transaction and no optimistic locking.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Insert rows; returns them as stored, with generated columns filled in
    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, ProviderError>;

    async fn select(&self, table: &str, query: &SelectQuery) -> Result<Vec<Row>, ProviderError>;

    /// Set the given columns on every matching row and refresh `updated_at`
    async fn update(&self, table: &str, filter: &Filter, row: Row)
        -> Result<Vec<Row>, ProviderError>;

    /// Remove matching rows; returns what was removed
    async fn delete(&self, table: &str, filter: &Filter) -> Result<Vec<Row>, ProviderError>;

    /// Release connections. The provider must not be used afterwards.
    async fn close(&self) {}
}

/// Total order over JSON scalars used for in-process sorting.
///
/// Strings that parse as RFC 3339 timestamps compare chronologically.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => {
            match (parse_timestamp(x), parse_timestamp(y)) {
                (Some(tx), Some(ty)) => tx.cmp(&ty),
                _ => x.cmp(y),
            }
        }
        _ => a.to_string().cmp(&b.to_string()),
    }
}

pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_matches_all_conditions() {
        let filter = Filter::new().eq("is_published", true).eq("category", "sports");
        let mut row = Row::new();
        row.insert("is_published".into(), json!(true));
        row.insert("category".into(), json!("sports"));
        assert!(filter.matches(&row));

        row.insert("category".into(), json!("culture"));
        assert!(!filter.matches(&row));
    }

    #[test]
    fn test_filter_missing_column_only_matches_null() {
        let row = Row::new();
        assert!(Filter::new().eq("parent_id", Value::Null).matches(&row));
        assert!(!Filter::new().eq("parent_id", "x").matches(&row));
    }

    #[test]
    fn test_compare_timestamps_chronologically() {
        let earlier = json!("2024-05-01T09:00:00.000001+00:00");
        let later = json!("2024-05-01T10:00:00+01:00");
        // 10:00+01:00 is 09:00 UTC, one microsecond before `earlier`
        assert_eq!(compare_values(&earlier, &later), Ordering::Greater);
    }

    #[test]
    fn test_compare_null_sorts_first() {
        assert_eq!(compare_values(&Value::Null, &json!(1)), Ordering::Less);
        assert_eq!(compare_values(&json!(2), &json!(1)), Ordering::Greater);
    }
}
