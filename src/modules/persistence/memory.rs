//! In-process provider used by tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::{compare_values, Filter, Provider, ProviderError, Row, SelectQuery, SortDirection};
use crate::shared::constants::{CREATED_AT_COLUMN, ID_COLUMN, UPDATED_AT_COLUMN};

/// Table-per-`Vec` store with the same row contract as [`super::PgProvider`].
///
/// Timestamps are strictly increasing across all writes so ordering by
/// `created_at` is deterministic even within one clock tick.
#[derive(Default)]
pub struct MemoryProvider {
    tables: RwLock<HashMap<String, Vec<Row>>>,
    last_timestamp: Mutex<Option<DateTime<Utc>>>,
    failing: AtomicBool,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with [`ProviderError::Unavailable`]
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, AtomicOrdering::SeqCst);
    }

    /// Number of rows currently stored in `table`
    pub async fn row_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map(Vec::len)
            .unwrap_or_default()
    }

    fn check_available(&self) -> Result<(), ProviderError> {
        if self.failing.load(AtomicOrdering::SeqCst) {
            return Err(ProviderError::Unavailable(
                "memory provider is in failure mode".to_string(),
            ));
        }
        Ok(())
    }

    async fn next_timestamp(&self) -> String {
        let mut last = self.last_timestamp.lock().await;
        let mut now = Utc::now();
        if let Some(prev) = *last {
            if now <= prev {
                now = prev + Duration::microseconds(1);
            }
        }
        *last = Some(now);
        now.to_rfc3339_opts(SecondsFormat::Micros, false)
    }
}

#[async_trait]
impl Provider for MemoryProvider {
    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, ProviderError> {
        self.check_available()?;

        let mut stored = Vec::with_capacity(rows.len());
        for mut row in rows {
            let now = self.next_timestamp().await;
            row.insert(ID_COLUMN.to_string(), Value::String(Uuid::new_v4().to_string()));
            row.insert(CREATED_AT_COLUMN.to_string(), Value::String(now.clone()));
            row.insert(UPDATED_AT_COLUMN.to_string(), Value::String(now));
            stored.push(row);
        }

        self.tables
            .write()
            .await
            .entry(table.to_string())
            .or_default()
            .extend(stored.iter().cloned());

        Ok(stored)
    }

    async fn select(&self, table: &str, query: &SelectQuery) -> Result<Vec<Row>, ProviderError> {
        self.check_available()?;

        let tables = self.tables.read().await;
        let mut rows: Vec<Row> = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filter.matches(row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order_by {
            rows.sort_by(|a, b| {
                let left = a.get(&order.column).unwrap_or(&Value::Null);
                let right = b.get(&order.column).unwrap_or(&Value::Null);
                let ordering = compare_values(left, right);
                match order.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        Ok(rows)
    }

    async fn update(
        &self,
        table: &str,
        filter: &Filter,
        row: Row,
    ) -> Result<Vec<Row>, ProviderError> {
        self.check_available()?;

        let now = self.next_timestamp().await;
        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(table) else {
            return Ok(Vec::new());
        };

        let mut updated = Vec::new();
        for existing in rows.iter_mut().filter(|r| filter.matches(r)) {
            for (column, value) in &row {
                if column == ID_COLUMN || column == CREATED_AT_COLUMN {
                    continue;
                }
                existing.insert(column.clone(), value.clone());
            }
            existing.insert(UPDATED_AT_COLUMN.to_string(), Value::String(now.clone()));
            updated.push(existing.clone());
        }

        Ok(updated)
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<Vec<Row>, ProviderError> {
        self.check_available()?;

        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(table) else {
            return Ok(Vec::new());
        };

        let (removed, kept): (Vec<Row>, Vec<Row>) =
            rows.drain(..).partition(|r| filter.matches(r));
        *rows = kept;

        Ok(removed)
    }
}
