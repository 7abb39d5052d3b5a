use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::directory::handlers;
use crate::features::directory::services::DirectoryService;

/// Create routes for the directory feature
pub fn routes(service: Arc<DirectoryService>) -> Router {
    Router::new()
        .route("/api/directory/tree", get(handlers::get_directory_tree))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use axum_test::multipart::MultipartForm;
    use axum_test::TestServer;
    use serde_json::Value;

    use crate::shared::test_helpers::TestContext;

    #[tokio::test]
    async fn test_tree_route_wins_over_record_lookup() {
        let ctx = TestContext::new();
        let server = TestServer::new(ctx.router()).unwrap();

        let form = MultipartForm::new()
            .add_text("nodeType", "district")
            .add_text("name", "Ahmedabad")
            .add_text("displayOrder", "1");
        server
            .post("/api/directory")
            .multipart(form)
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let response = server.get("/api/directory/tree").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"][0]["name"], "Ahmedabad");
        assert_eq!(body["data"][0]["displayOrder"], 1);
    }
}
