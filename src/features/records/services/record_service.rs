//! Generic CRUD over every entity kind.
//!
//! One engine serves all kinds; per-kind behaviour comes entirely from the
//! kind's [`EntitySchema`]. Media writes follow upload-then-write: a failed
//! upload never reaches the provider, and a failed row write after a
//! successful upload triggers a compensating removal of the object.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::features::records::error::{DalError, Result};
use crate::features::records::media::{filename_from_url, MediaUploader, StoredMedia};
use crate::features::records::model::{ListFilter, MediaInput, Record, RecordInput};
use crate::features::records::schema::{DeletePolicy, EntityKind, EntitySchema, WriteMode};
use crate::modules::persistence::{
    Filter, OrderBy, Provider, ProviderError, Row, SelectQuery,
};
use crate::modules::storage::ObjectStorage;
use crate::shared::constants::{CREATED_AT_COLUMN, ID_COLUMN};

pub struct CrudEngine {
    provider: Arc<dyn Provider>,
    media: MediaUploader,
}

impl CrudEngine {
    pub fn new(provider: Arc<dyn Provider>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            provider,
            media: MediaUploader::new(storage),
        }
    }

    /// Insert a new record, uploading its media first if a binary is given
    pub async fn create(&self, kind: EntityKind, input: RecordInput) -> Result<Record> {
        let schema = kind.schema();
        let mut row = schema.to_row(&input.values, WriteMode::Create)?;
        let uploaded = self
            .apply_media(schema, input.media, &mut row, WriteMode::Create)
            .await?;

        let result = match self.provider.insert(schema.table, vec![row]).await {
            Ok(rows) => single_row(kind, rows).and_then(|row| schema.from_row(row)),
            Err(e) => Err(provider_failure(kind, "create", e)),
        };

        let record = self.settle(schema, uploaded, result).await?;
        info!("Created {} record {}", kind, record.id);
        Ok(record)
    }

    /// Visible records, newest first
    pub async fn list(&self, kind: EntityKind, options: ListFilter) -> Result<Vec<Record>> {
        let schema = kind.schema();
        let mut filter = schema.filter_for(&options.equals)?;

        if !options.include_hidden {
            if let Some(column) = schema.visibility_column() {
                // An explicit request for hidden rows without the admin view
                // can never match.
                if matches!(filter.conditions().get(column), Some(v) if v != &Value::Bool(true)) {
                    return Ok(Vec::new());
                }
                filter = filter.eq(column, true);
            }
        }

        let query = SelectQuery {
            filter,
            order_by: Some(OrderBy::desc(CREATED_AT_COLUMN)),
            limit: options.limit,
        };

        let rows = self
            .provider
            .select(schema.table, &query)
            .await
            .map_err(|e| provider_failure(kind, "list", e))?;

        debug!("Listed {} {} records", rows.len(), kind);
        rows.into_iter().map(|row| schema.from_row(row)).collect()
    }

    pub async fn get_by_id(&self, kind: EntityKind, id: Uuid) -> Result<Record> {
        let schema = kind.schema();
        let query = SelectQuery {
            filter: point_filter(schema, id),
            order_by: None,
            limit: Some(1),
        };

        let rows = self
            .provider
            .select(schema.table, &query)
            .await
            .map_err(|e| provider_failure(kind, "fetch", e))?;

        debug!("Fetched {} record {}", kind, id);
        let row = rows
            .into_iter()
            .next()
            .ok_or(DalError::NotFound { entity: kind, id })?;
        schema.from_row(row)
    }

    /// Full-row replace. Stored media is kept unless a new binary is given;
    /// the previously stored object is left in place.
    pub async fn update(&self, kind: EntityKind, id: Uuid, input: RecordInput) -> Result<Record> {
        let schema = kind.schema();
        let mut row = schema.to_row(&input.values, WriteMode::Replace)?;
        let uploaded = self
            .apply_media(schema, input.media, &mut row, WriteMode::Replace)
            .await?;

        let result = match self
            .provider
            .update(schema.table, &point_filter(schema, id), row)
            .await
        {
            Ok(rows) => rows
                .into_iter()
                .next()
                .ok_or(DalError::NotFound { entity: kind, id })
                .and_then(|row| schema.from_row(row)),
            Err(e) => Err(provider_failure(kind, "update", e)),
        };

        let record = self.settle(schema, uploaded, result).await?;
        info!("Updated {} record {}", kind, id);
        Ok(record)
    }

    /// Hard or soft delete per the kind's policy; returns the affected records
    pub async fn delete(&self, kind: EntityKind, id: Uuid) -> Result<Vec<Record>> {
        let schema = kind.schema();
        let filter = point_filter(schema, id);

        let rows = match (schema.delete_policy, schema.visibility_column()) {
            (DeletePolicy::Soft, Some(flag)) => {
                let mut hide = Row::new();
                hide.insert(flag.to_string(), Value::Bool(false));
                self.provider.update(schema.table, &filter, hide).await
            }
            _ => self.provider.delete(schema.table, &filter).await,
        }
        .map_err(|e| provider_failure(kind, "delete", e))?;

        if rows.is_empty() {
            return Err(DalError::NotFound { entity: kind, id });
        }

        info!(
            "Deleted {} record {} ({:?})",
            kind, id, schema.delete_policy
        );
        rows.into_iter().map(|row| schema.from_row(row)).collect()
    }

    /// Release the provider's connections
    pub async fn close(&self) {
        self.provider.close().await;
    }

    /// Resolve the caller's media input into URL/filename columns on `row`.
    /// Returns the uploaded object, if any, so a failed write can remove it.
    async fn apply_media(
        &self,
        schema: &EntitySchema,
        media: Option<MediaInput>,
        row: &mut Row,
        mode: WriteMode,
    ) -> Result<Option<StoredMedia>> {
        let Some(media) = media else {
            return Ok(None);
        };
        let Some(spec) = schema.media.as_ref() else {
            return Err(DalError::validation(format!(
                "{} records do not accept media",
                schema.kind
            )));
        };

        match media {
            MediaInput::Upload(file) => {
                let stored = self.media.upload(spec, file).await.map_err(|e| {
                    error!("Media upload for {} failed: {}", schema.kind, e);
                    DalError::MediaUpload(e)
                })?;
                row.insert(spec.url.column.to_string(), Value::String(stored.url.clone()));
                row.insert(
                    spec.filename.column.to_string(),
                    Value::String(stored.filename.clone()),
                );
                Ok(Some(stored))
            }
            MediaInput::Existing(url) if mode == WriteMode::Create && !url.trim().is_empty() => {
                row.insert(
                    spec.filename.column.to_string(),
                    Value::String(filename_from_url(&url)),
                );
                row.insert(spec.url.column.to_string(), Value::String(url));
                Ok(None)
            }
            MediaInput::Existing(_) => Ok(None),
        }
    }

    /// Pass a write result through, removing the uploaded object on failure
    async fn settle<T>(
        &self,
        schema: &EntitySchema,
        uploaded: Option<StoredMedia>,
        result: Result<T>,
    ) -> Result<T> {
        let (err, stored) = match (result, uploaded) {
            (Ok(value), _) => return Ok(value),
            (Err(e), None) => return Err(e),
            (Err(e), Some(stored)) => (e, stored),
        };

        let bucket = schema.media.as_ref().map(|m| m.bucket).unwrap_or_default();
        let compensated = self
            .media
            .remove(bucket, std::slice::from_ref(&stored.key))
            .await
            .is_ok();

        if compensated {
            info!(
                "Removed uploaded media '{}' after failed {} write",
                stored.key, schema.kind
            );
        } else {
            warn!(
                "Uploaded media '{}' is orphaned after failed {} write",
                stored.key, schema.kind
            );
        }

        Err(DalError::PartialFailure {
            key: stored.key,
            compensated,
            source: Box::new(err),
        })
    }
}

/// `id = ?`, plus the visibility flag for soft-deleting kinds so deleted
/// rows are invisible to point operations
fn point_filter(schema: &EntitySchema, id: Uuid) -> Filter {
    let filter = Filter::new().eq(ID_COLUMN, id.to_string());
    match (schema.delete_policy, schema.visibility_column()) {
        (DeletePolicy::Soft, Some(flag)) => filter.eq(flag, true),
        _ => filter,
    }
}

fn single_row(kind: EntityKind, rows: Vec<Row>) -> Result<Row> {
    rows.into_iter().next().ok_or_else(|| {
        DalError::Provider(ProviderError::MalformedRow(format!(
            "insert into {} returned no row",
            kind
        )))
    })
}

fn provider_failure(kind: EntityKind, operation: &str, e: ProviderError) -> DalError {
    error!("Failed to {} {} record: {}", operation, kind, e);
    DalError::Provider(e)
}
