use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Router};

use crate::features::records::services::CrudEngine;
use crate::features::records::handlers;

/// Create routes for the generic record endpoints
///
/// `max_body_size` bounds multipart bodies (media file plus form overhead).
pub fn routes(engine: Arc<CrudEngine>, max_body_size: usize) -> Router {
    Router::new()
        .route(
            "/api/{entity}",
            get(handlers::list_records).post(handlers::create_record),
        )
        .route(
            "/api/{entity}/{id}",
            get(handlers::get_record)
                .put(handlers::update_record)
                .delete(handlers::delete_record),
        )
        .layer(DefaultBodyLimit::max(max_body_size))
        .with_state(engine)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::shared::test_helpers::TestContext;

    fn server(ctx: &TestContext) -> TestServer {
        TestServer::new(ctx.router()).unwrap()
    }

    fn png_part(name: &str) -> Part {
        Part::bytes(vec![0x89, b'P', b'N', b'G'])
            .file_name(name)
            .mime_type("image/png")
    }

    #[tokio::test]
    async fn test_create_with_media_then_fetch() {
        let ctx = TestContext::new();
        let server = server(&ctx);

        let form = MultipartForm::new()
            .add_text("title", "Ganesh Chaturthi")
            .add_text("eventDate", "2024-09-07")
            .add_part("imageFile", png_part("ganesh.png"));
        let response = server.post("/api/celebrations").multipart(form).await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["title"], "Ganesh Chaturthi");
        assert_eq!(body["data"]["isPublished"], true);
        assert_eq!(body["data"]["imageFilename"], "ganesh.png");
        assert!(body["data"]["imageUrl"]
            .as_str()
            .unwrap()
            .contains("/announcements/celebrations/"));

        let id = body["data"]["id"].as_str().unwrap();
        let fetched: Value = server.get(&format!("/api/celebrations/{id}")).await.json();
        assert_eq!(fetched["data"]["eventDate"], "2024-09-07");
    }

    #[tokio::test]
    async fn test_list_with_filter_and_hidden() {
        let ctx = TestContext::new();
        let server = server(&ctx);

        for (title, category, published) in [
            ("Cricket final", "sports", "true"),
            ("Drama night", "culture", "true"),
            ("Draft", "sports", "false"),
        ] {
            let form = MultipartForm::new()
                .add_text("title", title)
                .add_text("category", category)
                .add_text("isPublished", published);
            server
                .post("/api/news")
                .multipart(form)
                .await
                .assert_status(StatusCode::CREATED);
        }

        let body: Value = server
            .get("/api/news")
            .add_query_param("category", "sports")
            .await
            .json();
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["meta"]["total"], 1);

        let body: Value = server
            .get("/api/news")
            .add_query_param("includeHidden", "true")
            .await
            .json();
        assert_eq!(body["data"].as_array().unwrap().len(), 3);
        assert_eq!(body["data"][0]["title"], "Draft");
    }

    #[tokio::test]
    async fn test_list_failure_is_empty_envelope() {
        let ctx = TestContext::new();
        ctx.provider.set_failing(true);

        let response = server(&ctx).get("/api/members").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["errorKind"], "provider");
        assert_eq!(body["message"], "Database error occurred");
    }

    #[tokio::test]
    async fn test_unknown_entity_and_bad_id_are_bad_requests() {
        let ctx = TestContext::new();
        let server = server(&ctx);

        server
            .get("/api/weddings")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .get("/api/news/not-a-uuid")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_limit_rejected() {
        let ctx = TestContext::new();
        let response = server(&ctx)
            .get("/api/news")
            .add_query_param("limit", "500")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["errorKind"], "validation");
    }

    #[tokio::test]
    async fn test_rejected_list_queries_keep_empty_data() {
        let ctx = TestContext::new();
        let server = server(&ctx);

        for (name, value) in [("colour", "red"), ("limit", "abc"), ("includeHidden", "maybe")] {
            let response = server.get("/api/news").add_query_param(name, value).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            let body: Value = response.json();
            assert_eq!(body["data"], json!([]), "{name}={value}");
            assert_eq!(body["errorKind"], "validation", "{name}={value}");
        }

        let response = server.get("/api/weddings").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_update_keeps_media_when_url_part_sent() {
        let ctx = TestContext::new();
        let server = server(&ctx);

        let form = MultipartForm::new()
            .add_text("personName", "Asha")
            .add_text("wishesFrom", "Family")
            .add_part("photoFile", png_part("asha.png"));
        let created: Value = server.post("/api/birthdays").multipart(form).await.json();
        let id = created["data"]["id"].as_str().unwrap();
        let url = created["data"]["photoUrl"].as_str().unwrap();

        let form = MultipartForm::new()
            .add_text("personName", "Asha M.")
            .add_text("photoFile", url);
        let response = server
            .put(&format!("/api/birthdays/{id}"))
            .multipart(form)
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["data"]["personName"], "Asha M.");
        assert_eq!(body["data"]["wishesFrom"], Value::Null);
        assert_eq!(body["data"]["photoUrl"], url);
        assert_eq!(body["data"]["photoFilename"], "asha.png");
    }

    #[tokio::test]
    async fn test_rejects_disallowed_media_type() {
        let ctx = TestContext::new();
        let form = MultipartForm::new().add_text("title", "Notice").add_part(
            "imageFile",
            Part::bytes(b"%PDF".to_vec())
                .file_name("notice.pdf")
                .mime_type("application/pdf"),
        );

        server(&ctx)
            .post("/api/condolences")
            .multipart(form)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        assert!(ctx.storage.keys("announcements").await.is_empty());
    }

    #[tokio::test]
    async fn test_upload_failure_maps_to_bad_gateway() {
        let ctx = TestContext::new();
        ctx.storage.set_fail_uploads(true);

        let form = MultipartForm::new()
            .add_text("fullName", "Nikhil Shah")
            .add_part("photoFile", png_part("n.png"));
        let response = server(&ctx).post("/api/members").multipart(form).await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: Value = response.json();
        assert_eq!(body["errorKind"], "media_upload");
        assert_eq!(ctx.provider.row_count("community_members").await, 0);
    }

    #[tokio::test]
    async fn test_delete_member_twice() {
        let ctx = TestContext::new();
        let server = server(&ctx);

        let form = MultipartForm::new().add_text("fullName", "Priya Desai");
        let created: Value = server.post("/api/members").multipart(form).await.json();
        let id = created["data"]["id"].as_str().unwrap();

        let response = server.delete(&format!("/api/members/{id}")).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"][0]["isActive"], false);

        let response = server.delete(&format!("/api/members/{id}")).await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["errorKind"], "not_found");
    }
}
