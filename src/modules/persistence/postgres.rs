//! Postgres provider
//!
//! Rows travel as JSONB in both directions: writes go through
//! `jsonb_populate_record` so Postgres performs the type coercion, and
//! reads come back as `to_jsonb(row)`. Filter values are bound as one JSONB
//! object and compared per column against the typed record it populates,
//! so `id` lookups can use the primary key index.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{debug, info};

use super::{Filter, Provider, ProviderError, Row, SelectQuery, SortDirection};
use crate::core::config::DatabaseConfig;
use crate::core::database;
use crate::shared::constants::UPDATED_AT_COLUMN;
use crate::shared::validation::IDENTIFIER_REGEX;

/// Provider backed by a sqlx Postgres pool
pub struct PgProvider {
    pool: PgPool,
}

impl PgProvider {
    /// Open a pool from configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, ProviderError> {
        let pool = database::create_pool(config).await?;
        info!(
            "Postgres provider connected (max_connections={})",
            config.max_connections
        );
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_rows(
        &self,
        sql: &str,
        binds: Vec<Value>,
    ) -> Result<Vec<Row>, ProviderError> {
        debug!("Executing provider statement: {}", sql);

        let mut query = sqlx::query_scalar::<_, Json<Value>>(sql);
        for bind in binds {
            query = query.bind(Json(bind));
        }

        let values = query.fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!("Provider statement failed: {:?}", e);
            ProviderError::Database(e)
        })?;

        values.into_iter().map(|Json(value)| into_row(value)).collect()
    }
}

#[async_trait]
impl Provider for PgProvider {
    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, ProviderError> {
        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let sql = insert_sql(table, &row)?;
            let binds = if row.is_empty() {
                Vec::new()
            } else {
                vec![Value::Object(row)]
            };
            stored.extend(self.fetch_rows(&sql, binds).await?);
        }
        Ok(stored)
    }

    async fn select(&self, table: &str, query: &SelectQuery) -> Result<Vec<Row>, ProviderError> {
        let sql = select_sql(table, query)?;
        let binds = filter_binds(&query.filter);
        self.fetch_rows(&sql, binds).await
    }

    async fn update(
        &self,
        table: &str,
        filter: &Filter,
        mut row: Row,
    ) -> Result<Vec<Row>, ProviderError> {
        row.remove(UPDATED_AT_COLUMN);
        let sql = update_sql(table, &row, filter)?;
        let mut binds = Vec::new();
        if !row.is_empty() {
            binds.push(Value::Object(row));
        }
        binds.extend(filter_binds(filter));
        self.fetch_rows(&sql, binds).await
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<Vec<Row>, ProviderError> {
        let sql = delete_sql(table, filter)?;
        self.fetch_rows(&sql, filter_binds(filter)).await
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Postgres provider closed");
    }
}

fn into_row(value: Value) -> Result<Row, ProviderError> {
    match value {
        Value::Object(row) => Ok(row),
        other => Err(ProviderError::MalformedRow(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

/// Double-quote an identifier after checking it against [`IDENTIFIER_REGEX`]
fn quote_ident(name: &str) -> Result<String, ProviderError> {
    if IDENTIFIER_REGEX.is_match(name) {
        Ok(format!("\"{}\"", name))
    } else {
        Err(ProviderError::InvalidIdentifier(name.to_string()))
    }
}

fn quoted_columns<'a>(
    columns: impl Iterator<Item = &'a String>,
) -> Result<Vec<String>, ProviderError> {
    columns.map(|c| quote_ident(c)).collect()
}

fn filter_binds(filter: &Filter) -> Vec<Value> {
    if filter.is_empty() {
        Vec::new()
    } else {
        vec![Value::Object(filter.conditions().clone())]
    }
}

/// `WHERE` clause comparing each filtered column with the matching column of
/// `jsonb_populate_record(NULL::table, $placeholder)`. `null` values match
/// with `IS NULL`. `table` must already be quoted.
fn where_clause(table: &str, filter: &Filter, placeholder: usize) -> Result<String, ProviderError> {
    if filter.is_empty() {
        return Ok(String::new());
    }

    let predicates = filter
        .conditions()
        .iter()
        .map(|(column, value)| {
            let column = quote_ident(column)?;
            Ok(if value.is_null() {
                format!("r.{column} IS NULL")
            } else {
                format!(
                    "r.{column} = (jsonb_populate_record(NULL::{table}, ${placeholder})).{column}"
                )
            })
        })
        .collect::<Result<Vec<_>, ProviderError>>()?;

    Ok(format!(" WHERE {}", predicates.join(" AND ")))
}

pub(crate) fn insert_sql(table: &str, row: &Row) -> Result<String, ProviderError> {
    let table = quote_ident(table)?;
    if row.is_empty() {
        return Ok(format!(
            "INSERT INTO {table} AS r DEFAULT VALUES RETURNING to_jsonb(r)"
        ));
    }

    let columns = quoted_columns(row.keys())?;
    let projected: Vec<String> = columns.iter().map(|c| format!("p.{}", c)).collect();
    Ok(format!(
        "INSERT INTO {table} AS r ({}) SELECT {} FROM jsonb_populate_record(NULL::{table}, $1) AS p RETURNING to_jsonb(r)",
        columns.join(", "),
        projected.join(", "),
    ))
}

pub(crate) fn select_sql(table: &str, query: &SelectQuery) -> Result<String, ProviderError> {
    let table = quote_ident(table)?;
    let mut sql = format!("SELECT to_jsonb(r) FROM {table} AS r");
    sql.push_str(&where_clause(&table, &query.filter, 1)?);

    if let Some(order) = &query.order_by {
        let direction = match order.direction {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        };
        sql.push_str(&format!(
            " ORDER BY r.{} {}",
            quote_ident(&order.column)?,
            direction
        ));
    }

    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    Ok(sql)
}

pub(crate) fn update_sql(table: &str, row: &Row, filter: &Filter) -> Result<String, ProviderError> {
    let table = quote_ident(table)?;
    let updated_at = quote_ident(UPDATED_AT_COLUMN)?;

    let columns = quoted_columns(row.keys().filter(|c| c.as_str() != UPDATED_AT_COLUMN))?;

    let (set_clause, filter_placeholder) = if columns.is_empty() {
        (format!("{updated_at} = NOW()"), 1)
    } else {
        let projected: Vec<String> = columns.iter().map(|c| format!("p.{}", c)).collect();
        (
            format!(
                "({}, {updated_at}) = (SELECT {}, NOW() FROM jsonb_populate_record(NULL::{table}, $1) AS p)",
                columns.join(", "),
                projected.join(", "),
            ),
            2,
        )
    };

    Ok(format!(
        "UPDATE {table} AS r SET {set_clause}{} RETURNING to_jsonb(r)",
        where_clause(&table, filter, filter_placeholder)?
    ))
}

pub(crate) fn delete_sql(table: &str, filter: &Filter) -> Result<String, ProviderError> {
    let table = quote_ident(table)?;
    Ok(format!(
        "DELETE FROM {table} AS r{} RETURNING to_jsonb(r)",
        where_clause(&table, filter, 1)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::persistence::OrderBy;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_insert_sql_projects_populated_record() {
        let sql = insert_sql(
            "news_items",
            &row(&[("title", json!("t")), ("is_published", json!(true))]),
        )
        .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO \"news_items\" AS r (\"is_published\", \"title\") SELECT p.\"is_published\", p.\"title\" FROM jsonb_populate_record(NULL::\"news_items\", $1) AS p RETURNING to_jsonb(r)"
        );
    }

    #[test]
    fn test_insert_sql_empty_row_uses_defaults() {
        let sql = insert_sql("news_items", &Row::new()).unwrap();
        assert!(sql.contains("DEFAULT VALUES"));
    }

    #[test]
    fn test_select_sql_with_filter_order_and_limit() {
        let query = SelectQuery {
            filter: Filter::new().eq("is_published", true),
            order_by: Some(OrderBy::desc("created_at")),
            limit: Some(10),
        };
        let sql = select_sql("news_items", &query).unwrap();
        assert_eq!(
            sql,
            "SELECT to_jsonb(r) FROM \"news_items\" AS r WHERE r.\"is_published\" = (jsonb_populate_record(NULL::\"news_items\", $1)).\"is_published\" ORDER BY r.\"created_at\" DESC LIMIT 10"
        );
    }

    #[test]
    fn test_update_sql_refreshes_updated_at() {
        let sql = update_sql(
            "news_items",
            &row(&[("title", json!("t"))]),
            &Filter::new().eq("id", "abc"),
        )
        .unwrap();
        assert_eq!(
            sql,
            "UPDATE \"news_items\" AS r SET (\"title\", \"updated_at\") = (SELECT p.\"title\", NOW() FROM jsonb_populate_record(NULL::\"news_items\", $1) AS p) WHERE r.\"id\" = (jsonb_populate_record(NULL::\"news_items\", $2)).\"id\" RETURNING to_jsonb(r)"
        );
    }

    #[test]
    fn test_update_sql_empty_row_only_touches_timestamp() {
        let sql = update_sql("news_items", &Row::new(), &Filter::new().eq("id", "abc")).unwrap();
        assert_eq!(
            sql,
            "UPDATE \"news_items\" AS r SET \"updated_at\" = NOW() WHERE r.\"id\" = (jsonb_populate_record(NULL::\"news_items\", $1)).\"id\" RETURNING to_jsonb(r)"
        );
    }

    #[test]
    fn test_delete_sql() {
        let sql = delete_sql("news_items", &Filter::new().eq("id", "abc")).unwrap();
        assert_eq!(
            sql,
            "DELETE FROM \"news_items\" AS r WHERE r.\"id\" = (jsonb_populate_record(NULL::\"news_items\", $1)).\"id\" RETURNING to_jsonb(r)"
        );
    }

    #[test]
    fn test_where_clause_compares_each_column() {
        let filter = Filter::new()
            .eq("id", "abc")
            .eq("is_active", true)
            .eq("parent_id", Value::Null);
        let sql = delete_sql("directory_nodes", &filter).unwrap();
        assert_eq!(
            sql,
            "DELETE FROM \"directory_nodes\" AS r WHERE \
             r.\"id\" = (jsonb_populate_record(NULL::\"directory_nodes\", $1)).\"id\" AND \
             r.\"is_active\" = (jsonb_populate_record(NULL::\"directory_nodes\", $1)).\"is_active\" AND \
             r.\"parent_id\" IS NULL \
             RETURNING to_jsonb(r)"
        );
        assert!(!sql.contains("to_jsonb(r) @>"));
    }

    #[test]
    fn test_rejects_unsafe_identifiers() {
        let err = select_sql("news; DROP TABLE x", &SelectQuery::default()).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidIdentifier(_)));

        let err = insert_sql("news_items", &row(&[("Title\"", json!(1))])).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidIdentifier(_)));

        let err = delete_sql("news_items", &Filter::new().eq("id = id --", 1)).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidIdentifier(_)));
    }
}
