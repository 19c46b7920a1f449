use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use video_upload_backend::{
    build_router,
    config::Config,
    models::AppState,
    repository::SqliteVideoRepository,
    service::VideoService,
    storage::LocalStorage,
    system_info,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "video_upload_backend={},tower_http=debug",
            config.log_level
        ))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Ensure upload directory exists and the schema is current
    let storage = Arc::new(LocalStorage::new(&config.upload_dir).await?);
    let repository = Arc::new(SqliteVideoRepository::connect(&config.database).await?);

    system_info::print_startup_info(&config);

    let app_state = Arc::new(AppState {
        service: VideoService::new(storage, repository),
    });

    let app = build_router(app_state);

    let addr = config.bind_addr();
    info!("🚀 Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("✅ Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
