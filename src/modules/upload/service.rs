use log::info;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::modules::upload::model::{NewFile, UploadConfig, UploadResponse};
use crate::modules::upload::repository::FileRepository;
use crate::modules::upload::storage::ObjectStorage;
use crate::modules::user::repository::UserRepository;
use crate::utils::new_key;

#[derive(Clone)]
pub struct UploadService {
    file_repo: Arc<dyn FileRepository + Send + Sync>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
    storage: Arc<dyn ObjectStorage + Send + Sync>,
    config: UploadConfig,
}

impl UploadService {
    pub fn with_dependencies(
        file_repo: Arc<dyn FileRepository + Send + Sync>,
        user_repo: Arc<dyn UserRepository + Send + Sync>,
        storage: Arc<dyn ObjectStorage + Send + Sync>,
        config: UploadConfig,
    ) -> Self {
        info!("UploadService initialized with dependencies");
        UploadService { file_repo, user_repo, storage, config }
    }

    pub fn max_file_size(&self) -> usize {
        self.config.max_file_size
    }

    /// Falls back to a guess from the file name when the client sent no
    /// usable content type.
    fn resolve_mime(file_name: &str, mime_type: Option<&str>) -> String {
        match mime_type.map(str::trim) {
            Some(m) if !m.is_empty() && m != "application/octet-stream" => m.to_lowercase(),
            _ => mime_guess::from_path(file_name).first_or_octet_stream().essence_str().to_string(),
        }
    }

    fn validate(&self, size: usize, mime_type: &str) -> Result<(), error::SystemError> {
        if size == 0 {
            return Err(error::SystemError::bad_request("File is empty"));
        }

        if size > self.config.max_file_size {
            return Err(error::SystemError::bad_request(format!(
                "File size exceeds maximum allowed size of {} bytes",
                self.config.max_file_size
            )));
        }

        if !self.config.allowed_mime_types.iter().any(|m| m == mime_type) {
            return Err(error::SystemError::bad_request(format!(
                "File type '{}' is not allowed",
                mime_type
            )));
        }

        Ok(())
    }

    fn object_name(file_name: &str) -> String {
        let extension = Path::new(file_name).extension().and_then(|ext| ext.to_str()).unwrap_or("");
        let id = Uuid::now_v7();
        if extension.is_empty() {
            id.to_string()
        } else {
            format!("{}.{}", id, extension.to_lowercase())
        }
    }

    /// Stores the bytes, then records the upload against its owner.
    pub async fn upload_file(
        &self,
        user_key: &str,
        file_name: String,
        bytes: Vec<u8>,
        mime_type: Option<String>,
    ) -> Result<UploadResponse, error::SystemError> {
        let user = self
            .user_repo
            .find_by_key(user_key)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        let mime_type = Self::resolve_mime(&file_name, mime_type.as_deref());
        self.validate(bytes.len(), &mime_type)?;

        let object_name = Self::object_name(&file_name);
        let file_url = self.storage.put(&object_name, &bytes).await?;

        let file = self
            .file_repo
            .create(&NewFile {
                file_key: new_key(),
                user_id: user.id,
                file_name,
                file_url,
                mime_type,
                size: bytes.len() as i64,
                created_at: chrono::Utc::now(),
            })
            .await?;

        info!("Stored {} ({} bytes) as {} for {}", file.file_name, file.size, object_name, user_key);
        Ok(file.into())
    }
}
