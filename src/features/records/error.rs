use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::records::schema::EntityKind;
use crate::modules::persistence::ProviderError;
use crate::modules::storage::StorageError;

/// Coarse classification of a [`DalError`], stable for programmatic checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Provider,
    MediaUpload,
    PartialFailure,
}

#[derive(Debug, Error)]
pub enum DalError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{entity} record '{id}' not found")]
    NotFound { entity: EntityKind, id: Uuid },

    #[error("Persistence provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Media upload failed: {0}")]
    MediaUpload(#[source] StorageError),

    /// The media object was stored but the row write failed afterwards
    #[error("Record write failed after uploading '{key}' (uploaded object removed: {compensated}): {source}")]
    PartialFailure {
        key: String,
        compensated: bool,
        #[source]
        source: Box<DalError>,
    },
}

impl DalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DalError::Validation(_) => ErrorKind::Validation,
            DalError::NotFound { .. } => ErrorKind::NotFound,
            DalError::Provider(_) => ErrorKind::Provider,
            DalError::MediaUpload(_) => ErrorKind::MediaUpload,
            DalError::PartialFailure { .. } => ErrorKind::PartialFailure,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        DalError::Validation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, DalError>;
