//! Shared helpers for HTTP end-to-end tests.

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use modelgate_api::{app, ApiConfig, AppState};
use modelgate_core::{DirStore, RawModelLoader};

pub const BOUNDARY: &str = "modelgate-test-boundary";

/// Router backed by a `DirStore` at `dir` that expects `expected_digest`.
pub fn test_app(dir: &Path, expected_digest: &str) -> Router {
    let store = DirStore::open(dir).unwrap();
    let state = AppState::new(
        ApiConfig::new(expected_digest),
        Arc::new(store),
        Arc::new(RawModelLoader),
    );
    app(state)
}

/// Same as `test_app` with a custom body limit.
pub fn test_app_with_limit(dir: &Path, expected_digest: &str, limit: usize) -> Router {
    let store = DirStore::open(dir).unwrap();
    let mut config = ApiConfig::new(expected_digest);
    config.max_upload_bytes = limit;
    app(AppState::new(
        config,
        Arc::new(store),
        Arc::new(RawModelLoader),
    ))
}

/// `POST /upload/` with a single multipart field.
pub fn upload_request(field: &str, file_name: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload/")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn inference_request(file_name: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/inference/?file_name={file_name}"))
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(resp: Response) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
