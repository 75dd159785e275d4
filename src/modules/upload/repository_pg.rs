use uuid::Uuid;

use crate::{
    api::error,
    modules::upload::{model::NewFile, repository::FileRepository, schema::FileEntity},
};

#[derive(Clone)]
pub struct FileRepositoryPg {
    pool: sqlx::PgPool,
}

impl FileRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FileRepository for FileRepositoryPg {
    async fn create(&self, file: &NewFile) -> Result<FileEntity, error::SystemError> {
        let entity = sqlx::query_as::<_, FileEntity>(
            r#"
            INSERT INTO files
                (id, file_key, user_id, file_name, file_url, mime_type, size, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&file.file_key)
        .bind(file.user_id)
        .bind(&file.file_name)
        .bind(&file.file_url)
        .bind(&file.mime_type)
        .bind(file.size)
        .bind(file.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity)
    }
}
