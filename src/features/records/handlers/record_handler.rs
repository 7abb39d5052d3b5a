use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppPath, AppQuery, AppRejection};
use crate::features::records::dtos::{check_media, ListRecordsQuery, RecordFormDto};
use crate::features::records::services::CrudEngine;
use crate::features::records::model::{MediaFile, MediaInput, Record, RecordInput};
use crate::features::records::schema::EntityKind;
use crate::shared::types::ApiResponse;

/// List records of one entity kind
///
/// Newest first. Hidden records (unpublished / inactive) are only returned
/// with `includeHidden=true`. Any logical field name may be passed as an
/// equality filter, e.g. `?category=sports`.
#[utoipa::path(
    get,
    path = "/api/{entity}",
    params(
        ("entity" = EntityKind, Path, description = "Entity kind slug"),
        ListRecordsQuery
    ),
    responses(
        (status = 200, description = "Records, newest first", body = ApiResponse<Vec<Record>>),
        (status = 400, description = "Unknown entity, filter or invalid limit", body = ApiResponse<Vec<Record>>),
    ),
    tag = "records"
)]
pub async fn list_records(
    State(engine): State<Arc<CrudEngine>>,
    path: std::result::Result<AppPath<EntityKind>, AppRejection>,
    query: std::result::Result<AppQuery<HashMap<String, String>>, AppRejection>,
) -> Response {
    match list(&engine, path, query).await {
        Ok(records) => {
            (StatusCode::OK, Json(ApiResponse::from_list_result(Ok(records)))).into_response()
        }
        Err(e) => e.into_list_response(),
    }
}

async fn list(
    engine: &CrudEngine,
    path: std::result::Result<AppPath<EntityKind>, AppRejection>,
    query: std::result::Result<AppQuery<HashMap<String, String>>, AppRejection>,
) -> Result<Vec<Record>> {
    let AppPath(kind) = path?;
    let AppQuery(params) = query?;
    let query = ListRecordsQuery::from_params(kind, params)?;
    Ok(engine.list(kind, query.into_filter()).await?)
}

/// Get one record by id
#[utoipa::path(
    get,
    path = "/api/{entity}/{id}",
    params(
        ("entity" = EntityKind, Path, description = "Entity kind slug"),
        ("id" = Uuid, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "Record found", body = ApiResponse<Record>),
        (status = 404, description = "Record not found")
    ),
    tag = "records"
)]
pub async fn get_record(
    State(engine): State<Arc<CrudEngine>>,
    AppPath((kind, id)): AppPath<(EntityKind, Uuid)>,
) -> Result<Json<ApiResponse<Record>>> {
    let record = engine.get_by_id(kind, id).await?;
    Ok(Json(ApiResponse::success(Some(record), None, None)))
}

/// Create a record
///
/// Accepts multipart/form-data with one text part per logical field and,
/// for entities with media, a file part under the media field name
/// (`imageFile` or `photoFile`).
#[utoipa::path(
    post,
    path = "/api/{entity}",
    params(("entity" = EntityKind, Path, description = "Entity kind slug")),
    request_body(
        content = RecordFormDto,
        content_type = "multipart/form-data",
        description = "Record fields plus optional media file",
    ),
    responses(
        (status = 201, description = "Record created", body = ApiResponse<Record>),
        (status = 400, description = "Validation error"),
        (status = 502, description = "Media upload failed")
    ),
    tag = "records"
)]
pub async fn create_record(
    State(engine): State<Arc<CrudEngine>>,
    AppPath(kind): AppPath<EntityKind>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Record>>)> {
    let input = read_record_form(kind, multipart).await?;
    let record = engine.create(kind, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(record),
            Some(format!("{} record created", kind)),
            None,
        )),
    ))
}

/// Replace a record
///
/// Full replace: fields left out of the form are cleared. Stored media is
/// kept unless a new file is sent.
#[utoipa::path(
    put,
    path = "/api/{entity}/{id}",
    params(
        ("entity" = EntityKind, Path, description = "Entity kind slug"),
        ("id" = Uuid, Path, description = "Record id")
    ),
    request_body(
        content = RecordFormDto,
        content_type = "multipart/form-data",
        description = "Complete record fields plus optional replacement media",
    ),
    responses(
        (status = 200, description = "Record replaced", body = ApiResponse<Record>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Record not found"),
        (status = 502, description = "Media upload failed")
    ),
    tag = "records"
)]
pub async fn update_record(
    State(engine): State<Arc<CrudEngine>>,
    AppPath((kind, id)): AppPath<(EntityKind, Uuid)>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<Record>>> {
    let input = read_record_form(kind, multipart).await?;
    let record = engine.update(kind, id, input).await?;

    Ok(Json(ApiResponse::success(
        Some(record),
        Some(format!("{} record updated", kind)),
        None,
    )))
}

/// Delete a record
///
/// Members and directory nodes are deactivated; every other kind is removed.
#[utoipa::path(
    delete,
    path = "/api/{entity}/{id}",
    params(
        ("entity" = EntityKind, Path, description = "Entity kind slug"),
        ("id" = Uuid, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "Affected records", body = ApiResponse<Vec<Record>>),
        (status = 404, description = "Record not found")
    ),
    tag = "records"
)]
pub async fn delete_record(
    State(engine): State<Arc<CrudEngine>>,
    AppPath((kind, id)): AppPath<(EntityKind, Uuid)>,
) -> Result<Json<ApiResponse<Vec<Record>>>> {
    let records = engine.delete(kind, id).await?;
    Ok(Json(ApiResponse::success(
        Some(records),
        Some(format!("{} record deleted", kind)),
        None,
    )))
}

/// Collect multipart parts into a [`RecordInput`].
///
/// Text parts are coerced to the field's type. Names that are not fields of
/// the entity pass through as text so the engine rejects them.
async fn read_record_form(kind: EntityKind, mut multipart: Multipart) -> Result<RecordInput> {
    let schema = kind.schema();
    let media_name = schema.media.as_ref().map(|m| m.logical);
    let mut input = RecordInput::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();
        if name.is_empty() {
            continue;
        }

        if Some(name.as_str()) == media_name {
            if let Some(filename) = field.file_name().map(str::to_string) {
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                // Browsers send an empty file part when nothing was chosen
                if data.is_empty() && filename.is_empty() {
                    continue;
                }

                let file = MediaFile::new(filename, content_type, data.to_vec());
                check_media(&file)?;
                input.media = Some(MediaInput::Upload(file));
            } else {
                let url = read_text(field).await?;
                if !url.trim().is_empty() {
                    input.media = Some(MediaInput::Existing(url));
                }
            }
            continue;
        }

        let text = read_text(field).await?;
        let value = match schema.field(&name) {
            Some(spec) => spec.parse(&text)?,
            None => Value::String(text),
        };
        input.values.insert(name, value);
    }

    Ok(input)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    let name = field.name().unwrap_or("").to_string();
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read '{}' field: {}", name, e)))
}
