//! Features layer - HTTP-facing business features

pub mod directory;
pub mod records;

use std::sync::Arc;

use axum::Router;

use crate::features::directory::{routes as directory_routes, DirectoryService};
use crate::features::records::{routes as records_routes, CrudEngine};

/// All API routes over one engine
pub fn api_routes(engine: Arc<CrudEngine>, max_body_size: usize) -> Router {
    let directory_service = Arc::new(DirectoryService::new(Arc::clone(&engine)));

    Router::new()
        .merge(directory_routes::routes(directory_service))
        .merge(records_routes::routes(engine, max_body_size))
}
