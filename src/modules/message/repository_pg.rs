use uuid::Uuid;

use crate::{
    api::error,
    modules::message::{
        model::{InsertMedia, InsertMessage, MessageQuery},
        repository::{MediaRepository, MessageRepository},
        schema::{MediaEntity, MessageEntity},
    },
};

#[derive(Clone)]
pub struct MessageRepositoryPg {
    pool: sqlx::PgPool,
}

impl MessageRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MessageRepository for MessageRepositoryPg {
    async fn create(&self, message: &InsertMessage) -> Result<MessageEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let message = sqlx::query_as::<_, MessageEntity>(
            r#"
            INSERT INTO messages
                (id, message_key, chat_id, sender_id, content, type, media_url, reply_to, is_ai,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&message.message_key)
        .bind(message.chat_id)
        .bind(message.sender_id)
        .bind(&message.content)
        .bind(message._type)
        .bind(&message.media_url)
        .bind(message.reply_to)
        .bind(message.is_ai)
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    async fn find_by_key(
        &self,
        message_key: &str,
    ) -> Result<Option<MessageEntity>, error::SystemError> {
        let message =
            sqlx::query_as::<_, MessageEntity>("SELECT * FROM messages WHERE message_key = $1")
                .bind(message_key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(message)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<MessageEntity>, error::SystemError> {
        let messages =
            sqlx::query_as::<_, MessageEntity>("SELECT * FROM messages WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        Ok(messages)
    }

    async fn find_by_query(
        &self,
        query: &MessageQuery,
    ) -> Result<Vec<MessageEntity>, error::SystemError> {
        // index on (chat_id, created_at DESC, id DESC)
        let messages = sqlx::query_as::<_, MessageEntity>(
            r#"
            SELECT *
            FROM messages
            WHERE chat_id = $1
            AND ($2::timestamptz IS NULL OR (created_at, id) < ($2, $3::uuid))
            ORDER BY created_at DESC, id DESC
            LIMIT $4
            OFFSET $5
            "#,
        )
        .bind(query.chat_id)
        .bind(query.before.map(|c| c.created_at))
        .bind(query.before.map(|c| c.id))
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn find_all_by_chat(
        &self,
        chat_id: &Uuid,
    ) -> Result<Vec<MessageEntity>, error::SystemError> {
        let messages = sqlx::query_as::<_, MessageEntity>(
            "SELECT * FROM messages WHERE chat_id = $1 ORDER BY created_at, id",
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }

    async fn find_latest_by_chat(
        &self,
        chat_id: &Uuid,
    ) -> Result<Option<MessageEntity>, error::SystemError> {
        let message = sqlx::query_as::<_, MessageEntity>(
            r#"
            SELECT *
            FROM messages
            WHERE chat_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(chat_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(message)
    }

    async fn delete(&self, message_id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(message_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }
}

#[derive(Clone)]
pub struct MediaRepositoryPg {
    pool: sqlx::PgPool,
}

impl MediaRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MediaRepository for MediaRepositoryPg {
    async fn create(&self, media: &InsertMedia) -> Result<MediaEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let details = &media.details;
        let media = sqlx::query_as::<_, MediaEntity>(
            r#"
            INSERT INTO media
                (id, message_id, url, type, size, mime_type, duration, file_name,
                 width, height, resolution, bit_rate, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(media.message_id)
        .bind(&media.url)
        .bind(media._type)
        .bind(details.size)
        .bind(&details.mime_type)
        .bind(details.duration)
        .bind(&details.file_name)
        .bind(details.width)
        .bind(details.height)
        .bind(&details.resolution)
        .bind(details.bit_rate)
        .bind(media.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(media)
    }

    async fn delete_by_message(&self, message_id: &Uuid) -> Result<u64, error::SystemError> {
        let rows = sqlx::query("DELETE FROM media WHERE message_id = $1")
            .bind(message_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows)
    }
}
