use std::path::PathBuf;

use crate::api::error;

/// Write-only object store returning the public URL of what it stored.
#[async_trait::async_trait]
pub trait ObjectStorage {
    async fn put(&self, object_name: &str, bytes: &[u8]) -> Result<String, error::SystemError>;
}

/// Files under a local directory, served elsewhere under `base_url`.
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    dir: PathBuf,
    base_url: String,
}

impl LocalObjectStorage {
    pub fn new(dir: impl Into<PathBuf>, base_url: &str) -> Self {
        Self { dir: dir.into(), base_url: base_url.trim_end_matches('/').to_string() }
    }
}

#[async_trait::async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn put(&self, object_name: &str, bytes: &[u8]) -> Result<String, error::SystemError> {
        let storage_error =
            |e: std::io::Error| error::SystemError::external(format!("Object storage failed: {e}"));

        tokio::fs::create_dir_all(&self.dir).await.map_err(storage_error)?;
        tokio::fs::write(self.dir.join(object_name), bytes).await.map_err(storage_error)?;

        Ok(format!("{}/{}", self.base_url, object_name))
    }
}
