use crate::{
    error::AppError,
    models::{AppState, HealthResponse, VideoDto},
};
use axum::{
    body::Body,
    extract::{rejection::PathRejection, Path, Request, State},
    http::header::CONTENT_TYPE,
    response::Json,
};
use bytes::Bytes;
use http_body_util::BodyExt;
use multer::Multipart;
use std::{sync::Arc, time::Instant};
use tracing::{error, info};

/// Parsed `POST /videos` form.
struct UploadForm {
    title: String,
    file_name: String,
    data: Bytes,
}

/// Upload a video file with its title
pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Result<Json<VideoDto>, AppError> {
    let start_time = Instant::now();

    let form = read_upload_form(request).await?;
    let size_mb = form.data.len() as f64 / 1024.0 / 1024.0;

    info!("[POST /videos] 📁 File: {}", form.file_name);
    info!(
        "[POST /videos] 📦 Size: {:.2} MB ({} bytes)",
        size_mb,
        form.data.len()
    );

    let video = state
        .service
        .upload(form.title, &form.file_name, form.data)
        .await?;

    info!(
        "[POST /videos] ✅ SUCCESS - Video ID: {} in {:.2}s",
        video.id,
        start_time.elapsed().as_secs_f64()
    );

    Ok(Json(video))
}

/// Look up a video record by id
pub async fn get_video_handler(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<VideoDto>, AppError> {
    let Path(id) = id.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let video = state.service.get(id).await?;
    Ok(Json(video))
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        db_healthy: state.service.is_healthy().await,
    })
}

/// Buffer the whole request and pull out the `file` and `title` parts.
async fn read_upload_form(request: Request<Body>) -> Result<UploadForm, AppError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing Content-Type header".to_string()))?;

    let boundary = multer::parse_boundary(content_type).map_err(|e| {
        error!("Failed to parse boundary: {}", e);
        AppError::BadRequest(format!("Invalid multipart request: {}", e))
    })?;

    let body_bytes = request
        .into_body()
        .collect()
        .await
        .map_err(|e| {
            error!("Failed to read request body: {}", e);
            AppError::BadRequest(format!("Failed to read request: {}", e))
        })?
        .to_bytes();

    let mut multipart = Multipart::with_reader(body_bytes.as_ref(), boundary);

    let mut file: Option<(String, Bytes)> = None;
    let mut title: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::BadRequest("File part has no file name".to_string()))?;
                let data = field.bytes().await.map_err(multipart_error)?;
                file = Some((file_name, data));
            }
            Some("title") => {
                title = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {
                // Drain unknown fields
                field.bytes().await.map_err(multipart_error)?;
            }
        }
    }

    let (file_name, data) =
        file.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;
    let title = title.ok_or_else(|| AppError::BadRequest("Missing title".to_string()))?;

    Ok(UploadForm {
        title,
        file_name,
        data,
    })
}

fn multipart_error(e: multer::Error) -> AppError {
    error!("Multipart parsing error: {}", e);
    AppError::BadRequest(format!("Error parsing multipart request: {}", e))
}
