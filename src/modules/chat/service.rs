use log::info;
use std::{collections::HashMap, sync::Arc};
use uuid::Uuid;

use crate::api::error;
use crate::modules::chat::model::{
    ChatDetail, GetOrCreateChatModel, LastMessageInfo, NewChat, ParticipantInfo,
};
use crate::modules::chat::repository::ChatRepository;
use crate::modules::chat::schema::{ChatEntity, ChatType};
use crate::modules::message::repository::{MediaRepository, MessageRepository};
use crate::modules::message::schema::MessageType;
use crate::modules::user::repository::UserRepository;
use crate::utils::new_key;

#[derive(Clone)]
pub struct ChatService {
    chat_repo: Arc<dyn ChatRepository + Send + Sync>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
    message_repo: Arc<dyn MessageRepository + Send + Sync>,
    media_repo: Arc<dyn MediaRepository + Send + Sync>,
}

/// Sorted and deduplicated, the stored form of a participant set.
pub fn canonical_participants(mut participants: Vec<Uuid>) -> Vec<Uuid> {
    participants.sort_unstable();
    participants.dedup();
    participants
}

impl ChatService {
    pub fn with_dependencies(
        chat_repo: Arc<dyn ChatRepository + Send + Sync>,
        user_repo: Arc<dyn UserRepository + Send + Sync>,
        message_repo: Arc<dyn MessageRepository + Send + Sync>,
        media_repo: Arc<dyn MediaRepository + Send + Sync>,
    ) -> Self {
        info!("ChatService initialized with dependencies");
        ChatService { chat_repo, user_repo, message_repo, media_repo }
    }

    pub async fn get_or_create_chat(
        &self,
        model: GetOrCreateChatModel,
    ) -> Result<ChatEntity, error::SystemError> {
        let sender = self
            .user_repo
            .find_by_key(&model.sender_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        let mut participants = Vec::with_capacity(model.participant_ids.len() + 1);
        participants.push(sender.id);
        for key in &model.participant_ids {
            let user = self.user_repo.find_by_key(key).await?.ok_or_else(|| {
                error::SystemError::not_found(format!("Participant {key} not found"))
            })?;
            participants.push(user.id);
        }
        let participants = canonical_participants(participants);

        if model._type == ChatType::Private && participants.len() != 2 {
            return Err(error::SystemError::bad_request(
                "A private chat requires exactly 2 distinct participants",
            ));
        }

        if let Some(chat) = self.chat_repo.find_by_participants(&model._type, &participants).await?
        {
            info!("Existing chat {} reused", chat.id);
            return Ok(chat);
        }

        // lookup and create are separate calls; concurrent callers may both create
        let chat = self
            .chat_repo
            .create(&NewChat {
                chat_key: new_key(),
                sender_id: sender.id,
                participants,
                _type: model._type,
                created_at: chrono::Utc::now(),
            })
            .await?;

        info!("Chat {} created by {}", chat.id, sender.user_key);
        Ok(chat)
    }

    pub async fn get_chats(&self, user_key: &str) -> Result<Vec<ChatDetail>, error::SystemError> {
        let user = self
            .user_repo
            .find_by_key(user_key)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        let chats = self.chat_repo.find_all_by_participant(&user.id).await?;
        self.enrich(chats).await
    }

    pub async fn get_chat(&self, chat_key: &str) -> Result<ChatDetail, error::SystemError> {
        let chat = self
            .chat_repo
            .find_by_key(chat_key)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Chat not found"))?;

        self.enrich(vec![chat])
            .await?
            .pop()
            .ok_or_else(|| error::SystemError::not_found("Chat not found"))
    }

    async fn enrich(&self, chats: Vec<ChatEntity>) -> Result<Vec<ChatDetail>, error::SystemError> {
        let message_ids: Vec<Uuid> = chats.iter().filter_map(|c| c.last_message_id).collect();
        let messages = if message_ids.is_empty() {
            HashMap::new()
        } else {
            self.message_repo
                .find_by_ids(&message_ids)
                .await?
                .into_iter()
                .map(|m| (m.id, m))
                .collect::<HashMap<_, _>>()
        };

        let mut user_ids: Vec<Uuid> =
            chats.iter().flat_map(|c| c.participants.iter().copied()).collect();
        user_ids.extend(messages.values().filter_map(|m| m.sender_id));
        let user_ids = canonical_participants(user_ids);

        let users = self
            .user_repo
            .find_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect::<HashMap<_, _>>();

        let details = chats
            .into_iter()
            .map(|chat| {
                let participants = chat
                    .participants
                    .iter()
                    .filter_map(|id| users.get(id))
                    .map(|u| ParticipantInfo {
                        id: u.id,
                        user_id: u.user_key.clone(),
                        name: u.name.clone(),
                    })
                    .collect();

                let last_message =
                    chat.last_message_id.and_then(|id| messages.get(&id)).map(|m| LastMessageInfo {
                        content: m.content.clone(),
                        created_at: m.created_at,
                        sender_id: m
                            .sender_id
                            .and_then(|id| users.get(&id))
                            .map(|u| u.user_key.clone()),
                        is_ai: m.is_ai,
                    });

                ChatDetail {
                    id: chat.id,
                    chat_id: chat.chat_key,
                    _type: chat._type,
                    participants,
                    last_message,
                    created_at: chat.created_at,
                    updated_at: chat.updated_at,
                }
            })
            .collect();

        Ok(details)
    }

    pub async fn delete_chat(&self, chat_key: &str) -> Result<(), error::SystemError> {
        let chat = self
            .chat_repo
            .find_by_key(chat_key)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Chat not found"))?;

        // not atomic: a failure mid-loop leaves the remaining messages in place
        let messages = self.message_repo.find_all_by_chat(&chat.id).await?;
        let count = messages.len();
        for message in messages {
            if message._type != MessageType::Text && message.media_url.is_some() {
                self.media_repo.delete_by_message(&message.id).await?;
            }
            self.message_repo.delete(&message.id).await?;
        }

        self.chat_repo.delete(&chat.id).await?;
        info!("Chat {} deleted with {} messages", chat.id, count);
        Ok(())
    }
}
