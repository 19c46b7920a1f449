use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod storage;
pub mod system_info;

use handlers::{get_video_handler, health_handler, upload_handler};
use models::AppState;

/// Build the application router shared by the binary and the integration tests.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/videos", post(upload_handler))
        .route("/videos/:id", get(get_video_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
