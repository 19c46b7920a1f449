use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::service::VideoService;

/// A persisted upload record, one row of the `videos` table.
#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct Video {
    pub id: i64,
    pub title: String,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Insert payload; the id is assigned by the database.
#[derive(Clone, Debug)]
pub struct NewVideo {
    pub title: String,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AppState {
    pub service: VideoService,
}

/// JSON view of a [`Video`] returned by both endpoints.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDto {
    pub id: i64,
    pub title: String,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<Video> for VideoDto {
    fn from(video: Video) -> Self {
        Self {
            id: video.id,
            title: video.title,
            file_name: video.file_name,
            uploaded_at: video.uploaded_at,
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}
