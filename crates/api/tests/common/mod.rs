use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use pitch_api::config::{ServerConfig, TextGenConfig};
use pitch_api::router::build_app_router;
use pitch_api::state::AppState;
use pitch_composer::generation::Completion;
use pitch_composer::{GenerationError, TextCompletionClient};
use pitch_core::generation::Prompt;
use pitch_db::{MemoryStore, PitchStore};

/// Build a test `ServerConfig` with safe defaults.
///
/// Runs on the in-memory store; autosaves stay pending for the length of a test.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        public_origin: "https://pitch.test".to_string(),
        database_url: None,
        storage_public_url: "https://cdn.test/storage".to_string(),
        storage_bucket: "images".to_string(),
        autosave_quiet_ms: 1000,
        textgen: TextGenConfig {
            api_url: "http://127.0.0.1:9/unused".to_string(),
            api_key: None,
            model: "test-model".to_string(),
        },
    }
}

/// Completion client that always answers with the same text.
pub struct CannedCompletion(pub &'static str);

#[async_trait]
impl TextCompletionClient for CannedCompletion {
    async fn complete(&self, _prompt: &Prompt) -> Result<Completion, GenerationError> {
        Ok(Completion {
            text: self.0.to_string(),
            usage: None,
        })
    }
}

/// The application router plus a handle on its backing store.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    /// A fresh router over the same state; `oneshot` consumes it.
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router over `store`, exactly as `main.rs`
/// does, so tests exercise the production middleware stack.
pub fn build_test_app_with(store: Arc<MemoryStore>) -> TestApp {
    let config = test_config();
    let dyn_store: Arc<dyn PitchStore> = store.clone();
    let state = AppState::new(
        dyn_store,
        None,
        config.clone(),
        Arc::new(CannedCompletion("\"Vi lager film som flytter folk.\"")),
    );
    TestApp {
        router: build_app_router(state, &config),
        store,
    }
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(Arc::new(MemoryStore::new()))
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request("POST", uri, body)).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request("PUT", uri, body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request("PATCH", uri, body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a project and return `(project_id, sections)` from the response.
pub async fn create_project(test: &TestApp, title: &str) -> (i64, Vec<serde_json::Value>) {
    let response = post_json(
        test.app(),
        "/api/v1/projects",
        serde_json::json!({ "title": title, "client_name": "Fjordkraft" }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    let json = body_json(response).await;
    let id = json["data"]["id"].as_i64().unwrap();
    let sections = json["data"]["sections"].as_array().unwrap().clone();
    (id, sections)
}

/// Id of the first section of `section_type` in a project response.
pub fn section_id(sections: &[serde_json::Value], section_type: &str) -> i64 {
    sections
        .iter()
        .find(|s| s["type"] == section_type)
        .and_then(|s| s["id"].as_i64())
        .unwrap()
}
