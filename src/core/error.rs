use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::features::records::error::{DalError, ErrorKind};
use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Dal(#[from] DalError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Status and envelope for this error. Provider failures are masked.
    fn envelope(self) -> (StatusCode, ApiResponse<()>) {
        match self {
            AppError::Dal(e) => {
                let status = status_for(e.kind());
                if status.is_server_error() {
                    tracing::error!("Request failed: {:?}", e);
                }

                let mut body = ApiResponse::<()>::from_result(Err(e));
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    body.message = Some("Database error occurred".to_string());
                }
                (status, body)
            }
            AppError::Validation(msg) => {
                let mut body = ApiResponse::<()>::error(Some(msg.clone()), Some(vec![msg]));
                body.error_kind = Some(ErrorKind::Validation);
                (StatusCode::BAD_REQUEST, body)
            }
            AppError::BadRequest(msg) => {
                let mut body = ApiResponse::<()>::error(Some(msg), None);
                body.error_kind = Some(ErrorKind::Validation);
                (StatusCode::BAD_REQUEST, body)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::<()>::error(Some("Internal server error".to_string()), None),
                )
            }
        }
    }

    /// Render as a failed list: same status and message, `data: []`
    pub fn into_list_response(self) -> Response {
        let (status, body) = self.envelope();
        (status, Json(body.into_list::<()>())).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.envelope();
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// HTTP status for a DAL failure
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::MediaUpload | ErrorKind::PartialFailure => StatusCode::BAD_GATEWAY,
        ErrorKind::Provider => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
