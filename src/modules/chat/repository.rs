use uuid::Uuid;

use crate::{
    api::error,
    modules::chat::{
        model::NewChat,
        schema::{ChatEntity, ChatType},
    },
};

#[async_trait::async_trait]
pub trait ChatRepository {
    async fn find_by_key(&self, chat_key: &str) -> Result<Option<ChatEntity>, error::SystemError>;

    /// First chat of `_type` whose canonical participant set equals `participants`.
    async fn find_by_participants(
        &self,
        _type: &ChatType,
        participants: &[Uuid],
    ) -> Result<Option<ChatEntity>, error::SystemError>;

    /// All chats containing `user_id`, most recently updated first.
    async fn find_all_by_participant(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<ChatEntity>, error::SystemError>;

    async fn create(&self, chat: &NewChat) -> Result<ChatEntity, error::SystemError>;

    async fn update_last_message(
        &self,
        chat_id: &Uuid,
        last_message_id: Option<Uuid>,
        updated_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), error::SystemError>;

    async fn delete(&self, chat_id: &Uuid) -> Result<bool, error::SystemError>;
}
