use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::error;

use crate::models::ErrorResponse;

/// Failures of the local file store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to create upload directory {path}: {source}")]
    Init {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("error storing file {name}: {source}")]
    Write {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failures of the video record store.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("video {0} not found")]
    NotFound(i64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Errors surfaced by the upload orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("video {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The record could not be read or written. On upload this leaves the
    /// already-stored file without a record.
    #[error("persistence failed: {0}")]
    Persistence(RepositoryError),
}

impl From<RepositoryError> for VideoError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => VideoError::NotFound(id),
            other => VideoError::Persistence(other),
        }
    }
}

/// Boundary error for HTTP handlers.
///
/// Not-found becomes a structured 404, malformed requests a 400, and every
/// infrastructure failure an opaque 500.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Video(#[from] VideoError),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Video(VideoError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Video not found".to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Video(err) => {
                error!("❌ Request failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            status: status.as_u16(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
