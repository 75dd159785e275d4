use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Record of one stored upload.
#[derive(Debug, Clone, FromRow)]
pub struct FileEntity {
    pub id: Uuid,
    pub file_key: String,
    pub user_id: Uuid,
    pub file_name: String,
    pub file_url: String,
    pub mime_type: String,
    pub size: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
