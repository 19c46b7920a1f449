use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::{
    config::DatabaseConfig,
    error::RepositoryError,
    models::{NewVideo, Video},
};

const COLUMNS: &str = "id, title, file_name, uploaded_at";

/// Persistence for video records. Records are only ever inserted and read.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn insert(&self, new: NewVideo) -> Result<Video, RepositoryError>;

    /// Fails with [`RepositoryError::NotFound`] if no record has this id.
    async fn find_by_id(&self, id: i64) -> Result<Video, RepositoryError>;

    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// SQLite-backed record store.
#[derive(Clone, Debug)]
pub struct SqliteVideoRepository {
    pool: SqlitePool,
}

impl SqliteVideoRepository {
    /// Connect to the configured database and apply migrations.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        let repository = Self { pool };
        repository.migrate().await?;
        info!("🗄️  Database ready at {}", config.url);
        Ok(repository)
    }

    /// Private in-memory database.
    ///
    /// Every SQLite connection to `:memory:` opens a separate database, so the
    /// pool is pinned to one connection that never expires.
    pub async fn in_memory() -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let repository = Self { pool };
        repository.migrate().await?;
        Ok(repository)
    }

    async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl VideoRepository for SqliteVideoRepository {
    async fn insert(&self, new: NewVideo) -> Result<Video, RepositoryError> {
        let query = format!(
            "INSERT INTO videos (title, file_name, uploaded_at)
             VALUES (?, ?, ?)
             RETURNING {COLUMNS}"
        );
        let video = sqlx::query_as::<_, Video>(&query)
            .bind(&new.title)
            .bind(&new.file_name)
            .bind(new.uploaded_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(video)
    }

    async fn find_by_id(&self, id: i64) -> Result<Video, RepositoryError> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = ?");
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
