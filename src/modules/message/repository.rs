use uuid::Uuid;

use crate::modules::message::model::{InsertMedia, InsertMessage, MessageQuery};
use crate::modules::message::schema::MediaEntity;
use crate::{api::error, modules::message::schema::MessageEntity};

#[async_trait::async_trait]
pub trait MessageRepository {
    async fn create(&self, message: &InsertMessage) -> Result<MessageEntity, error::SystemError>;

    async fn find_by_key(
        &self,
        message_key: &str,
    ) -> Result<Option<MessageEntity>, error::SystemError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<MessageEntity>, error::SystemError>;

    /// One page ordered by `(created_at, id)` descending, with `offset` and
    /// the exclusive `before` cursor applied after ordering.
    async fn find_by_query(
        &self,
        query: &MessageQuery,
    ) -> Result<Vec<MessageEntity>, error::SystemError>;

    async fn find_all_by_chat(&self, chat_id: &Uuid)
    -> Result<Vec<MessageEntity>, error::SystemError>;

    async fn find_latest_by_chat(
        &self,
        chat_id: &Uuid,
    ) -> Result<Option<MessageEntity>, error::SystemError>;

    async fn delete(&self, message_id: &Uuid) -> Result<bool, error::SystemError>;
}

#[async_trait::async_trait]
pub trait MediaRepository {
    async fn create(&self, media: &InsertMedia) -> Result<MediaEntity, error::SystemError>;

    async fn delete_by_message(&self, message_id: &Uuid) -> Result<u64, error::SystemError>;
}
