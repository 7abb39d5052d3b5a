use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::records::error::{DalError, ErrorKind};

/// Uniform response envelope: `{success, data, message, meta, errors, errorKind}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
            error_kind: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
            error_kind: None,
        }
    }

    /// Fold a DAL result into the envelope. Failures never carry data.
    pub fn from_result(result: Result<T, DalError>) -> Self {
        match result {
            Ok(data) => Self::success(Some(data), None, None),
            Err(e) => Self {
                success: false,
                data: None,
                message: Some(e.to_string()),
                meta: None,
                errors: None,
                error_kind: Some(e.kind()),
            },
        }
    }
}

impl ApiResponse<()> {
    /// Reshape a failure envelope for a list endpoint (`data: []`)
    pub fn into_list<T>(self) -> ApiResponse<Vec<T>> {
        ApiResponse {
            success: self.success,
            data: Some(Vec::new()),
            message: self.message,
            meta: self.meta,
            errors: self.errors,
            error_kind: self.error_kind,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Fold a DAL list result into the envelope.
    ///
    /// A failed list carries `data: []`, so callers treat it as empty rather
    /// than partial.
    pub fn from_list_result(result: Result<Vec<T>, DalError>) -> Self {
        match result {
            Ok(items) => {
                let total = items.len() as i64;
                Self::success(Some(items), None, Some(Meta { total }))
            }
            Err(e) => Self {
                success: false,
                data: Some(Vec::new()),
                message: Some(e.to_string()),
                meta: None,
                errors: None,
                error_kind: Some(e.kind()),
            },
        }
    }
}
