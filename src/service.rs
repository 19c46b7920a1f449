use bytes::Bytes;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};

use crate::{
    error::VideoError,
    models::{NewVideo, VideoDto},
    repository::VideoRepository,
    storage::Storage,
};

/// Sequences the file write and the record insert for one upload.
#[derive(Clone)]
pub struct VideoService {
    storage: Arc<dyn Storage>,
    repository: Arc<dyn VideoRepository>,
}

impl VideoService {
    pub fn new(storage: Arc<dyn Storage>, repository: Arc<dyn VideoRepository>) -> Self {
        Self {
            storage,
            repository,
        }
    }

    /// Store the file under its original name, then record it.
    ///
    /// There is no rollback: when the insert fails the file stays on disk
    /// without a record.
    pub async fn upload(
        &self,
        title: String,
        original_name: &str,
        data: Bytes,
    ) -> Result<VideoDto, VideoError> {
        let file_name = self.storage.store(data, original_name).await?;

        let new = NewVideo {
            title,
            file_name,
            uploaded_at: Utc::now(),
        };

        let video = match self.repository.insert(new).await {
            Ok(video) => video,
            Err(e) => {
                error!(
                    "[upload] ❌ Record insert failed, file left orphaned at {:?}: {}",
                    self.storage.resolve_path(original_name),
                    e
                );
                return Err(VideoError::Persistence(e));
            }
        };

        info!("[upload] ✅ Stored video {} as {}", video.id, video.file_name);
        Ok(video.into())
    }

    pub async fn get(&self, id: i64) -> Result<VideoDto, VideoError> {
        let video = self.repository.find_by_id(id).await?;
        Ok(video.into())
    }

    /// Whether the record store answers queries.
    pub async fn is_healthy(&self) -> bool {
        self.repository.ping().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::RepositoryError,
        models::Video,
        repository::SqliteVideoRepository,
        storage::LocalStorage,
    };
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct FailingRepository;

    #[async_trait]
    impl VideoRepository for FailingRepository {
        async fn insert(&self, _new: NewVideo) -> Result<Video, RepositoryError> {
            Err(RepositoryError::Database(sqlx::Error::PoolClosed))
        }

        async fn find_by_id(&self, _id: i64) -> Result<Video, RepositoryError> {
            Err(RepositoryError::Database(sqlx::Error::PoolClosed))
        }

        async fn ping(&self) -> Result<(), RepositoryError> {
            Err(RepositoryError::Database(sqlx::Error::PoolClosed))
        }
    }

    async fn service() -> (TempDir, Arc<LocalStorage>, VideoService) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(LocalStorage::new(dir.path()).await.unwrap());
        let repository = Arc::new(SqliteVideoRepository::in_memory().await.unwrap());
        let service = VideoService::new(storage.clone(), repository);
        (dir, storage, service)
    }

    #[tokio::test]
    async fn upload_then_get_returns_same_record() {
        let (_dir, storage, service) = service().await;

        let uploaded = service
            .upload("Intro".to_string(), "intro.mp4", Bytes::from_static(b"abc"))
            .await
            .unwrap();
        assert_eq!(uploaded.id, 1);
        assert_eq!(uploaded.title, "Intro");
        assert_eq!(uploaded.file_name, "intro.mp4");

        let fetched = service.get(uploaded.id).await.unwrap();
        assert_eq!(fetched, uploaded);

        let on_disk = tokio::fs::read(storage.resolve_path("intro.mp4")).await.unwrap();
        assert_eq!(on_disk, b"abc");
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let (_dir, _storage, service) = service().await;

        let err = service.get(999).await.unwrap_err();
        assert!(matches!(err, VideoError::NotFound(999)));
    }

    #[tokio::test]
    async fn successive_uploads_get_increasing_ids() {
        let (_dir, _storage, service) = service().await;

        let first = service
            .upload("One".to_string(), "one.mp4", Bytes::from_static(b"1"))
            .await
            .unwrap();
        let second = service
            .upload("Two".to_string(), "two.mp4", Bytes::from_static(b"2"))
            .await
            .unwrap();

        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn same_name_overwrites_file_but_keeps_both_records() {
        let (_dir, storage, service) = service().await;

        let first = service
            .upload("Take 1".to_string(), "take.mp4", Bytes::from_static(b"first"))
            .await
            .unwrap();
        let second = service
            .upload("Take 2".to_string(), "take.mp4", Bytes::from_static(b"second"))
            .await
            .unwrap();

        let on_disk = tokio::fs::read(storage.resolve_path("take.mp4")).await.unwrap();
        assert_eq!(on_disk, b"second");

        let first = service.get(first.id).await.unwrap();
        let second = service.get(second.id).await.unwrap();
        assert_eq!(first.title, "Take 1");
        assert_eq!(second.title, "Take 2");
        assert_eq!(first.file_name, second.file_name);
    }

    #[tokio::test]
    async fn failed_insert_leaves_orphaned_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(LocalStorage::new(dir.path()).await.unwrap());
        let service = VideoService::new(storage.clone(), Arc::new(FailingRepository));

        let err = service
            .upload("Intro".to_string(), "intro.mp4", Bytes::from_static(b"abc"))
            .await
            .unwrap_err();

        assert!(matches!(err, VideoError::Persistence(_)));
        assert!(storage.resolve_path("intro.mp4").exists());
        assert!(!service.is_healthy().await);
    }

    #[tokio::test]
    async fn failed_write_skips_insert() {
        let (_dir, _storage, service) = service().await;

        let err = service
            .upload("Intro".to_string(), "no/such/dir.mp4", Bytes::from_static(b"abc"))
            .await
            .unwrap_err();

        assert!(matches!(err, VideoError::Storage(_)));
        assert!(matches!(service.get(1).await, Err(VideoError::NotFound(1))));
    }
}
