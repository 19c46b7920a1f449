use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StorageError;

/// Durable file store for uploaded videos.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` under `suggested_name` and return the stored name.
    ///
    /// An existing file with the same name is overwritten.
    async fn store(&self, data: Bytes, suggested_name: &str) -> Result<String, StorageError>;

    /// Map a stored name back to its location. Does not check that the file exists.
    fn resolve_path(&self, stored_name: &str) -> PathBuf;
}

/// Flat directory on the local filesystem.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_dir: PathBuf,
}

impl LocalStorage {
    /// Open the store rooted at `base_dir`, creating the directory if needed.
    pub async fn new(base_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_dir = base_dir.into();
        tokio::fs::create_dir_all(&base_dir)
            .await
            .map_err(|source| StorageError::Init {
                path: base_dir.display().to_string(),
                source,
            })?;

        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn store(&self, data: Bytes, suggested_name: &str) -> Result<String, StorageError> {
        // Names are used verbatim: no escaping, no collision handling.
        let path = self.resolve_path(suggested_name);
        let len = data.len();

        tokio::fs::write(&path, data)
            .await
            .map_err(|source| StorageError::Write {
                name: suggested_name.to_string(),
                source,
            })?;

        debug!("[storage] 💾 Wrote {} bytes to {:?}", len, path);
        Ok(suggested_name.to_string())
    }

    fn resolve_path(&self, stored_name: &str) -> PathBuf {
        self.base_dir.join(stored_name)
    }
}
