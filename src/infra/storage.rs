//! File storage for uploaded pet images.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::config::Config;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Where uploaded files live and how clients reach them.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Write `bytes` under `file_name`, replacing any previous content
    async fn save(&self, file_name: &str, bytes: &[u8]) -> AppResult<()>;

    /// Remove a stored file; a missing file is not an error
    async fn remove(&self, file_name: &str) -> AppResult<()>;

    /// Public URL of a stored file
    fn public_url(&self, file_name: &str) -> String;
}

/// Stores files in a local directory served under `uploads_path`
pub struct LocalStorage {
    dir: PathBuf,
    base_url: String,
    uploads_path: String,
}

impl LocalStorage {
    pub fn new(
        dir: impl Into<PathBuf>,
        base_url: impl Into<String>,
        uploads_path: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.into(),
            uploads_path: uploads_path.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.upload_dir, &config.base_url, &config.uploads_path)
    }
}

#[async_trait]
impl FileStorage for LocalStorage {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> AppResult<()> {
        // Succeeds when the directory already exists or another request
        // created it first
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::internal(format!("Cannot create upload dir: {}", e)))?;

        tokio::fs::write(self.dir.join(file_name), bytes)
            .await
            .map_err(|e| AppError::internal(format!("Cannot write {}: {}", file_name, e)))
    }

    async fn remove(&self, file_name: &str) -> AppResult<()> {
        match tokio::fs::remove_file(self.dir.join(file_name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::internal(format!("Cannot remove {}: {}", file_name, e))),
        }
    }

    fn public_url(&self, file_name: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url.trim_end_matches('/'),
            self.uploads_path.trim_end_matches('/'),
            file_name
        )
    }
}
