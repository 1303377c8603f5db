pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        // Brand profile
        .route("/api/v1/sessions/:id/brand", post(handlers::handle_upload_brand))
        .route(
            "/api/v1/sessions/:id/brand/manual",
            post(handlers::handle_manual_brand),
        )
        // Segments (Darts)
        .route(
            "/api/v1/sessions/:id/segments",
            post(handlers::handle_upload_segments),
        )
        // Content personalization
        .route(
            "/api/v1/sessions/:id/content",
            post(handlers::handle_upload_content),
        )
        .route(
            "/api/v1/sessions/:id/personalize",
            post(handlers::handle_personalize),
        )
        .route(
            "/api/v1/sessions/:id/variants/:segment/revise",
            post(handlers::handle_revise),
        )
        .route(
            "/api/v1/sessions/:id/variants/:segment/download",
            get(handlers::handle_download),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::testing::ScriptedModel;
    use crate::session::pipeline::Pipeline;
    use crate::session::store::SessionStore;

    const BOUNDARY: &str = "darts-test-boundary";

    fn scripted() -> ScriptedModel {
        ScriptedModel::new(|messages| {
            let prompt = &messages[0].content;
            let answer = if prompt.starts_with("Extract the brand") {
                "Brand Voice: Bold\nBrand Positioning: Outdoor\nUnique Value Propositions: Warranty"
                    .to_string()
            } else if prompt.starts_with("List only the names") {
                "1. Trailblazer\n2. Weekend Warrior".to_string()
            } else if prompt.starts_with("Provide only") {
                "Characteristics: active\nPsychographic Drivers: freedom".to_string()
            } else if prompt.starts_with("Rewrite") {
                "**Hello** adventurer".to_string()
            } else {
                "Shorter hello".to_string()
            };
            Ok(answer)
        })
    }

    fn app() -> Router {
        let config = Config {
            openai_api_key: "test-key".to_string(),
            openai_api_url: "http://localhost/unused".to_string(),
            port: 0,
            rust_log: "info".to_string(),
            concurrency: 2,
            max_upload_bytes: 1024 * 1024,
        };
        build_router(AppState {
            sessions: SessionStore::new(),
            pipeline: Pipeline::new(Arc::new(scripted()), config.concurrency),
            config,
        })
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn upload_request(uri: &str, file_name: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: text/plain\r\n\r\n{content}\r\n--{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    async fn create_session(app: &Router) -> String {
        let response = send(app, json_request("POST", "/api/v1/sessions", json!({}))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["session_id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app();
        let response = send(
            &app,
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let app = app();
        let response = send(
            &app,
            Request::builder()
                .uri("/api/v1/sessions/00000000-0000-0000-0000-000000000000")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_upload_personalize_revise_download() {
        let app = app();
        let id = create_session(&app).await;

        let response = send(
            &app,
            json_request(
                "POST",
                &format!("/api/v1/sessions/{id}/brand/manual"),
                json!({"text": "We are bold outdoor people."}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["brand"]["voice"], "Bold");

        let response = send(
            &app,
            upload_request(&format!("/api/v1/sessions/{id}/segments"), "darts.txt", "Darts doc"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["total"], 2);
        assert_eq!(body["segments"][1]["name"], "Weekend Warrior");
        assert!(body["extraction_error"].is_null());

        let response = send(
            &app,
            upload_request(&format!("/api/v1/sessions/{id}/content"), "email.txt", "Buy now!"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["source"]["text"], "Buy now!");

        let response = send(
            &app,
            json_request(
                "POST",
                &format!("/api/v1/sessions/{id}/personalize"),
                json!({"targeted_segment": "Trailblazer"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["variants"].as_array().unwrap().len(), 1);
        assert_eq!(body["variants"][0]["segment"], "Weekend Warrior");
        assert_eq!(body["variants"][0]["text"], "Hello adventurer");

        let response = send(
            &app,
            json_request(
                "POST",
                &format!("/api/v1/sessions/{id}/variants/Weekend%20Warrior/revise"),
                json!({"instructions": "Shorter"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["kind"], "revised");

        let response = send(
            &app,
            Request::builder()
                .uri(format!("/api/v1/sessions/{id}/variants/Weekend%20Warrior/download"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Weekend_Warrior_revised.txt\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Shorter hello");
    }

    #[tokio::test]
    async fn test_personalize_without_inputs_is_400() {
        let app = app();
        let id = create_session(&app).await;
        let response = send(
            &app,
            json_request("POST", &format!("/api/v1/sessions/{id}/personalize"), json!({})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_degraded_pdf_upload_reports_stage() {
        let app = app();
        let id = create_session(&app).await;
        let response = send(
            &app,
            upload_request(&format!("/api/v1/sessions/{id}/brand"), "guide.pdf", "garbage"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["extraction_error"]["kind"], "pdf");
        assert_eq!(body["brand"]["voice"], "No information available.");
    }

    #[tokio::test]
    async fn test_delete_session() {
        let app = app();
        let id = create_session(&app).await;
        let delete = || {
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/sessions/{id}"))
                .body(Body::empty())
                .unwrap()
        };
        assert_eq!(send(&app, delete()).await.status(), StatusCode::NO_CONTENT);
        assert_eq!(send(&app, delete()).await.status(), StatusCode::NOT_FOUND);
    }
}
