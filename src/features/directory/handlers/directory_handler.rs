use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::directory::dtos::DirectoryTreeDto;
use crate::features::directory::services::DirectoryService;
use crate::shared::types::ApiResponse;

/// Get the community directory as a tree
///
/// Active nodes only, nested district → city → member and ordered by
/// `displayOrder`, then name.
#[utoipa::path(
    get,
    path = "/api/directory/tree",
    responses(
        (status = 200, description = "Directory tree", body = ApiResponse<Vec<DirectoryTreeDto>>),
    ),
    tag = "directory"
)]
pub async fn get_directory_tree(
    State(service): State<Arc<DirectoryService>>,
) -> Result<Json<ApiResponse<Vec<DirectoryTreeDto>>>> {
    let tree = service.tree().await?;
    Ok(Json(ApiResponse::success(Some(tree), None, None)))
}
