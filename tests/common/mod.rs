use std::sync::Arc;

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use video_upload_backend::build_router;
use video_upload_backend::models::AppState;
use video_upload_backend::repository::SqliteVideoRepository;
use video_upload_backend::service::VideoService;
use video_upload_backend::storage::LocalStorage;

pub const BOUNDARY: &str = "X-VIDEO-UPLOAD-BOUNDARY";

/// Router backed by a fresh upload directory and an in-memory database.
///
/// The returned `TempDir` must outlive the router.
pub async fn build_test_app() -> (TempDir, Router) {
    let repository = SqliteVideoRepository::in_memory().await.unwrap();
    build_test_app_with(repository).await
}

/// Same as [`build_test_app`] over a caller-prepared repository.
pub async fn build_test_app_with(repository: SqliteVideoRepository) -> (TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(LocalStorage::new(dir.path().join("uploads")).await.unwrap());
    let repository = Arc::new(repository);

    let state = Arc::new(AppState {
        service: VideoService::new(storage, repository),
    });

    (dir, build_router(state))
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: video/mp4\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart(app: Router, uri: &str, parts: &[Part<'_>]) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
