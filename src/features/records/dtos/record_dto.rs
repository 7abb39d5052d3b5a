use std::collections::HashMap;

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::core::error::AppError;
use crate::features::records::model::{ListFilter, MediaFile};
use crate::features::records::schema::EntityKind;
use crate::modules::persistence::Row;
use crate::shared::constants::{
    ALLOWED_MEDIA_TYPES, DEFAULT_PAGE_SIZE, MAX_MEDIA_SIZE, MAX_PAGE_SIZE,
};

/// Query params for listing records. Any other parameter is treated as an
/// equality filter on the logical field of the same name.
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListRecordsQuery {
    /// Include hidden (unpublished / inactive) records
    #[serde(default)]
    pub include_hidden: bool,
    /// Maximum number of records (1-100, default 50)
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u32>,
    #[serde(skip)]
    pub filters: Row,
}

impl ListRecordsQuery {
    /// Split raw query params into options and typed field filters
    pub fn from_params(
        kind: EntityKind,
        mut params: HashMap<String, String>,
    ) -> Result<Self, AppError> {
        let schema = kind.schema();

        let include_hidden = match params.remove("includeHidden").as_deref() {
            None | Some("") | Some("false") | Some("0") => false,
            Some("true") | Some("1") => true,
            Some(other) => {
                return Err(AppError::BadRequest(format!(
                    "includeHidden must be true or false, got '{}'",
                    other
                )))
            }
        };

        let limit = params
            .remove("limit")
            .map(|raw| {
                raw.parse::<u32>()
                    .map_err(|_| AppError::BadRequest("limit must be a number".to_string()))
            })
            .transpose()?;

        let mut filters = Row::new();
        for (name, raw) in params {
            let spec = schema.field(&name).ok_or_else(|| {
                AppError::Validation(format!("Unknown filter '{}' for {}", name, kind))
            })?;
            filters.insert(name, spec.parse(&raw)?);
        }

        let query = Self {
            include_hidden,
            limit,
            filters,
        };
        query
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        Ok(query)
    }

    pub fn into_filter(self) -> ListFilter {
        ListFilter {
            include_hidden: self.include_hidden,
            equals: self.filters,
            limit: Some(
                self.limit
                    .map_or(DEFAULT_PAGE_SIZE, |l| l as usize)
                    .min(MAX_PAGE_SIZE),
            ),
        }
    }
}

/// Multipart form for create and update.
/// Note: This struct is for Swagger UI documentation only.
/// The actual handlers read axum's Multipart directly: one text part per
/// logical field, plus the entity's media part (`imageFile` / `photoFile`).
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct RecordFormDto {
    /// Example text field; every logical field of the entity is accepted
    #[schema(example = "Annual general meeting")]
    pub title: Option<String>,
    /// The media binary. On update, a text value (the stored URL) keeps the
    /// current media unchanged.
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image_file: Option<String>,
}

/// Check an uploaded media file against size and type limits
pub fn check_media(file: &MediaFile) -> Result<(), AppError> {
    if file.data.len() > MAX_MEDIA_SIZE {
        return Err(AppError::BadRequest(format!(
            "File too large. Maximum size is {} bytes ({} MB)",
            MAX_MEDIA_SIZE,
            MAX_MEDIA_SIZE / 1024 / 1024
        )));
    }

    if !ALLOWED_MEDIA_TYPES.contains(&file.content_type.as_str()) {
        return Err(AppError::BadRequest(format!(
            "File type '{}' is not allowed. Allowed types: {}",
            file.content_type,
            ALLOWED_MEDIA_TYPES.join(", ")
        )));
    }

    Ok(())
}
