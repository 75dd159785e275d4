use serde::Serialize;
use uuid::Uuid;

use crate::constants::Env;
use crate::modules::upload::schema::FileEntity;

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_file_size: usize,
    pub allowed_mime_types: Vec<String>,
}

impl UploadConfig {
    pub fn from_env(env: &Env) -> Self {
        Self { max_file_size: env.max_upload_bytes, ..Default::default() }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024, // 10MB
            allowed_mime_types: [
                "image/jpeg",
                "image/png",
                "image/gif",
                "image/webp",
                "video/mp4",
                "video/webm",
                "video/quicktime",
                "audio/mpeg",
                "audio/mp4",
                "audio/aac",
                "audio/wav",
                "audio/ogg",
                "application/pdf",
                "text/plain",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewFile {
    pub file_key: String,
    pub user_id: Uuid,
    pub file_name: String,
    pub file_url: String,
    pub mime_type: String,
    pub size: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub id: Uuid,
    pub file_id: String,
    pub url: String,
    pub file_name: String,
    pub mime_type: String,
    pub size: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<FileEntity> for UploadResponse {
    fn from(entity: FileEntity) -> Self {
        UploadResponse {
            id: entity.id,
            file_id: entity.file_key,
            url: entity.file_url,
            file_name: entity.file_name,
            mime_type: entity.mime_type,
            size: entity.size,
            created_at: entity.created_at,
        }
    }
}
