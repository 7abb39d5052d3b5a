use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        FromRequestParts, Path, Query,
    },
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;

/// Path extractor that answers with the standard envelope on bad input
/// (unknown entity slug, malformed UUID)
pub struct AppPath<T>(pub T);

impl<T, S> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppRejection::Path(rejection)),
        }
    }
}

/// Query extractor with the same error shape as [`AppPath`]
pub struct AppQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppRejection::Query(rejection)),
        }
    }
}

pub enum AppRejection {
    Path(PathRejection),
    Query(QueryRejection),
}

impl From<AppRejection> for AppError {
    fn from(rejection: AppRejection) -> Self {
        let message = match rejection {
            AppRejection::Path(err) => format!("Invalid path: {}", err.body_text()),
            AppRejection::Query(err) => format!("Invalid query: {}", err.body_text()),
        };
        AppError::BadRequest(message)
    }
}

impl IntoResponse for AppRejection {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
