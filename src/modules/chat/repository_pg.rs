use uuid::Uuid;

use crate::{
    api::error,
    modules::chat::{
        model::NewChat,
        repository::ChatRepository,
        schema::{ChatEntity, ChatType},
    },
};

#[derive(Clone)]
pub struct ChatRepositoryPg {
    pool: sqlx::PgPool,
}

impl ChatRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ChatRepository for ChatRepositoryPg {
    async fn find_by_key(&self, chat_key: &str) -> Result<Option<ChatEntity>, error::SystemError> {
        let chat = sqlx::query_as::<_, ChatEntity>("SELECT * FROM chats WHERE chat_key = $1")
            .bind(chat_key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(chat)
    }

    async fn find_by_participants(
        &self,
        _type: &ChatType,
        participants: &[Uuid],
    ) -> Result<Option<ChatEntity>, error::SystemError> {
        // participants are stored sorted, so array equality is set equality
        let chat = sqlx::query_as::<_, ChatEntity>(
            r#"
            SELECT *
            FROM chats
            WHERE type = $1
            AND participants = $2
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(_type)
        .bind(participants)
        .fetch_optional(&self.pool)
        .await?;

        Ok(chat)
    }

    async fn find_all_by_participant(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<ChatEntity>, error::SystemError> {
        let chats = sqlx::query_as::<_, ChatEntity>(
            r#"
            SELECT *
            FROM chats
            WHERE participants @> ARRAY[$1]::uuid[]
            ORDER BY updated_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(chats)
    }

    async fn create(&self, chat: &NewChat) -> Result<ChatEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let chat = sqlx::query_as::<_, ChatEntity>(
            r#"
            INSERT INTO chats (id, chat_key, sender_id, participants, type, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&chat.chat_key)
        .bind(chat.sender_id)
        .bind(&chat.participants)
        .bind(chat._type)
        .bind(chat.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(chat)
    }

    async fn update_last_message(
        &self,
        chat_id: &Uuid,
        last_message_id: Option<Uuid>,
        updated_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), error::SystemError> {
        let rows = sqlx::query(
            r#"
            UPDATE chats
            SET last_message_id = $2,
                updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(chat_id)
        .bind(last_message_id)
        .bind(updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(error::SystemError::not_found("Chat not found"));
        }
        Ok(())
    }

    async fn delete(&self, chat_id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM chats WHERE id = $1")
            .bind(chat_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }
}
