use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::constants::{DEFAULT_MESSAGE_LIMIT, MAX_MESSAGE_LIMIT};
use crate::modules::chat::{repository::ChatRepository, schema::ChatEntity};
use crate::modules::message::model::{
    GetMessagesQuery, GetMessagesResponse, InsertMedia, InsertMessage, MessageCursor,
    MessageQuery, MessageResponse, SendMessageModel,
};
use crate::modules::message::repository::{MediaRepository, MessageRepository};
use crate::modules::message::schema::{MessageEntity, MessageType};
use crate::modules::user::repository::UserRepository;
use crate::utils::new_key;

#[derive(Clone)]
pub struct MessageService {
    message_repo: Arc<dyn MessageRepository + Send + Sync>,
    media_repo: Arc<dyn MediaRepository + Send + Sync>,
    chat_repo: Arc<dyn ChatRepository + Send + Sync>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
}

impl MessageService {
    pub fn with_dependencies(
        message_repo: Arc<dyn MessageRepository + Send + Sync>,
        media_repo: Arc<dyn MediaRepository + Send + Sync>,
        chat_repo: Arc<dyn ChatRepository + Send + Sync>,
        user_repo: Arc<dyn UserRepository + Send + Sync>,
    ) -> Self {
        info!("MessageService initialized with dependencies");
        MessageService { message_repo, media_repo, chat_repo, user_repo }
    }

    async fn find_chat(&self, chat_key: &str) -> Result<ChatEntity, error::SystemError> {
        self.chat_repo
            .find_by_key(chat_key)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Chat not found"))
    }

    /// Stores a message and points the chat's last message at it.
    pub async fn append(
        &self,
        chat_id: &Uuid,
        sender_id: Option<Uuid>,
        content: String,
        _type: MessageType,
        is_ai: bool,
    ) -> Result<MessageEntity, error::SystemError> {
        self.insert_and_patch(InsertMessage {
            message_key: new_key(),
            chat_id: *chat_id,
            sender_id,
            content,
            _type,
            media_url: None,
            reply_to: None,
            is_ai,
            created_at: chrono::Utc::now(),
        })
        .await
    }

    async fn insert_and_patch(
        &self,
        message: InsertMessage,
    ) -> Result<MessageEntity, error::SystemError> {
        let message = self.message_repo.create(&message).await?;
        self.chat_repo
            .update_last_message(&message.chat_id, Some(message.id), message.created_at)
            .await?;
        Ok(message)
    }

    pub async fn send_message(
        &self,
        model: SendMessageModel,
    ) -> Result<MessageEntity, error::SystemError> {
        let sender = self
            .user_repo
            .find_by_key(&model.sender_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        let chat = self.find_chat(&model.chat_id).await?;

        if !chat.has_participant(&sender.id) {
            return Err(error::SystemError::forbidden("Sender is not a participant of this chat"));
        }

        if model._type == MessageType::Text && model.content.trim().is_empty() {
            return Err(error::SystemError::bad_request("Text message content cannot be empty"));
        }

        let media_type = model._type.media_type();
        if let (Some(media_type), Some(details)) = (media_type, &model.media) {
            if model.media_url.is_none() {
                return Err(error::SystemError::bad_request("Media details require a media URL"));
            }
            if media_type.requires_duration() && details.duration.is_none() {
                return Err(error::SystemError::bad_request(
                    "Audio and video media require a duration",
                ));
            }
        }

        let reply_to = match &model.reply_to {
            Some(reply_key) => {
                let target = self
                    .message_repo
                    .find_by_key(reply_key)
                    .await?
                    .filter(|m| m.chat_id == chat.id)
                    .ok_or_else(|| error::SystemError::not_found("Reply target not found"))?;
                Some(target.id)
            }
            None => None,
        };

        let now = chrono::Utc::now();
        let message = self
            .insert_and_patch(InsertMessage {
                message_key: new_key(),
                chat_id: chat.id,
                sender_id: Some(sender.id),
                content: model.content,
                _type: model._type,
                media_url: model.media_url.clone(),
                reply_to,
                is_ai: false,
                created_at: now,
            })
            .await?;

        if let (Some(media_type), Some(details), Some(url)) =
            (media_type, model.media, model.media_url)
        {
            self.media_repo
                .create(&InsertMedia {
                    message_id: message.id,
                    url,
                    _type: media_type,
                    details,
                    created_at: now,
                })
                .await?;
        }

        info!("Message {} sent to chat {}", message.id, chat.id);
        Ok(message)
    }

    pub async fn get_messages(
        &self,
        chat_key: &str,
        query: GetMessagesQuery,
    ) -> Result<GetMessagesResponse, error::SystemError> {
        let chat = self.find_chat(chat_key).await?;

        let before = match &query.before {
            Some(raw) => Some(
                MessageCursor::parse(raw)
                    .ok_or_else(|| error::SystemError::bad_request("Invalid cursor"))?,
            ),
            None => None,
        };

        let limit = query.limit.unwrap_or(DEFAULT_MESSAGE_LIMIT).clamp(1, MAX_MESSAGE_LIMIT);
        let messages = self
            .message_repo
            .find_by_query(&MessageQuery {
                chat_id: chat.id,
                before,
                limit,
                offset: query.offset.unwrap_or(0).max(0),
            })
            .await?;

        let cursor = if messages.len() as i64 == limit {
            messages.last().map(|m| MessageCursor::from(m).encode())
        } else {
            None
        };

        Ok(GetMessagesResponse {
            messages: messages.into_iter().map(MessageResponse::from).collect(),
            cursor,
        })
    }

    pub async fn delete_message(
        &self,
        message_key: &str,
        chat_key: &str,
    ) -> Result<(), error::SystemError> {
        let message = self
            .message_repo
            .find_by_key(message_key)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Message not found"))?;

        let chat = self.find_chat(chat_key).await?;

        if message.chat_id != chat.id {
            return Err(error::SystemError::not_found("Message not found"));
        }

        self.media_repo.delete_by_message(&message.id).await?;
        self.message_repo.delete(&message.id).await?;

        if chat.last_message_id == Some(message.id) {
            let latest = self.message_repo.find_latest_by_chat(&chat.id).await?;
            self.chat_repo
                .update_last_message(&chat.id, latest.map(|m| m.id), chrono::Utc::now())
                .await?;
        }

        info!("Message {} deleted from chat {}", message.id, chat.id);
        Ok(())
    }
}
