//! In-memory stand-ins for Postgres and Redis, used by service tests.

use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    HttpMessage,
};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::api::error;
use crate::configs::CacheStore;
use crate::modules::chat::{
    model::NewChat,
    repository::ChatRepository,
    schema::{ChatEntity, ChatType},
};
use crate::modules::message::{
    model::{InsertMedia, InsertMessage, MessageQuery},
    repository::{MediaRepository, MessageRepository},
    schema::{MediaEntity, MessageEntity},
};
use crate::modules::notification::{
    model::InsertNotification,
    repository::NotificationRepository,
    schema::{NotificationEntity, NotificationType},
};
use crate::modules::upload::{model::NewFile, repository::FileRepository, schema::FileEntity};
use crate::modules::user::{
    model::{InsertUser, UpdateUser},
    repository::UserRepository,
    schema::{UserEntity, UserRole},
};
use crate::utils::{new_key, Claims};

/// Stands in for bearer authentication: the `X-Test-User` header becomes the
/// token subject, and `X-Test-Role: admin` grants the admin role.
pub async fn claims_from_header<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<B>, actix_web::Error>
where
    B: MessageBody + 'static,
{
    let header = |name: &str| {
        req.headers().get(name).and_then(|h| h.to_str().ok()).unwrap_or_default().to_string()
    };
    let role = if header("X-Test-Role") == "admin" { UserRole::Admin } else { UserRole::User };
    let claims = Claims { sub: header("X-Test-User"), iat: 0, exp: 0, role };

    req.extensions_mut().insert(claims);
    next.call(req).await
}

#[derive(Default)]
struct State {
    users: Vec<UserEntity>,
    chats: Vec<ChatEntity>,
    messages: Vec<MessageEntity>,
    media: Vec<MediaEntity>,
    notifications: Vec<NotificationEntity>,
    files: Vec<FileEntity>,
}

/// Vectors kept in insertion order; newest-first reads reverse them before a
/// stable sort so equal timestamps still come back latest-inserted first.
#[derive(Default)]
pub struct MemoryDb {
    state: Mutex<State>,
}

fn newest_first<T>(
    items: impl DoubleEndedIterator<Item = T>,
    key: impl Fn(&T) -> chrono::DateTime<chrono::Utc>,
) -> Vec<T> {
    let mut items: Vec<T> = items.rev().collect();
    items.sort_by_key(|item| std::cmp::Reverse(key(item)));
    items
}

impl MemoryDb {
    pub fn seed_user(&self, user_key: &str, name: &str) -> UserEntity {
        let mut state = self.state.lock().unwrap();
        if let Some(user) = state.users.iter().find(|u| u.user_key == user_key) {
            return user.clone();
        }
        let now = chrono::Utc::now();
        let user = UserEntity {
            id: Uuid::now_v7(),
            user_key: user_key.to_string(),
            name: name.to_string(),
            role: UserRole::User,
            email: None,
            picture: None,
            height: None,
            weight: None,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        user
    }

    /// Creates the chat directly, seeding any missing user named after its key.
    pub fn seed_chat(&self, _type: ChatType, user_keys: &[&str]) -> ChatEntity {
        let users: Vec<UserEntity> = user_keys.iter().map(|k| self.seed_user(k, k)).collect();
        let mut participants: Vec<Uuid> = users.iter().map(|u| u.id).collect();
        participants.sort_unstable();
        participants.dedup();
        self.insert_chat(users[0].id, participants, _type)
    }

    pub fn seed_ai_chat(&self, user: &UserEntity) -> ChatEntity {
        self.insert_chat(user.id, vec![user.id], ChatType::Private)
    }

    fn insert_chat(&self, sender_id: Uuid, participants: Vec<Uuid>, _type: ChatType) -> ChatEntity {
        let now = chrono::Utc::now();
        let chat = ChatEntity {
            id: Uuid::now_v7(),
            chat_key: new_key(),
            sender_id,
            participants,
            _type,
            last_message_id: None,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().unwrap().chats.push(chat.clone());
        chat
    }

    pub fn seed_notification(&self, user_key: &str, created_at: chrono::DateTime<chrono::Utc>) {
        self.state.lock().unwrap().notifications.push(NotificationEntity {
            id: Uuid::now_v7(),
            notification_key: new_key(),
            user_key: user_key.to_string(),
            _type: NotificationType::Reminder,
            content: "seeded".to_string(),
            is_read: false,
            created_at,
            updated_at: created_at,
        });
    }

    pub fn chat(&self, id: &Uuid) -> Option<ChatEntity> {
        self.state.lock().unwrap().chats.iter().find(|c| c.id == *id).cloned()
    }

    pub fn chat_count(&self) -> usize {
        self.state.lock().unwrap().chats.len()
    }

    pub fn message_count(&self) -> usize {
        self.state.lock().unwrap().messages.len()
    }

    pub fn media_count(&self) -> usize {
        self.state.lock().unwrap().media.len()
    }

    pub fn media_for(&self, message_id: &Uuid) -> Vec<MediaEntity> {
        let state = self.state.lock().unwrap();
        state.media.iter().filter(|m| m.message_id == *message_id).cloned().collect()
    }

    pub fn notification_count(&self) -> usize {
        self.state.lock().unwrap().notifications.len()
    }

    pub fn files_for(&self, user_id: &Uuid) -> Vec<FileEntity> {
        let state = self.state.lock().unwrap();
        state.files.iter().filter(|f| f.user_id == *user_id).cloned().collect()
    }

    pub fn file_count(&self) -> usize {
        self.state.lock().unwrap().files.len()
    }
}

#[async_trait::async_trait]
impl UserRepository for MemoryDb {
    async fn find_by_key(&self, user_key: &str) -> Result<Option<UserEntity>, error::SystemError> {
        Ok(self.state.lock().unwrap().users.iter().find(|u| u.user_key == user_key).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserEntity>, error::SystemError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().filter(|u| ids.contains(&u.id)).cloned().collect())
    }

    async fn create(&self, user: &InsertUser) -> Result<Uuid, error::SystemError> {
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.user_key == user.user_key) {
            return Err(error::SystemError::Conflict(None));
        }
        let id = Uuid::now_v7();
        state.users.push(UserEntity {
            id,
            user_key: user.user_key.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
            email: user.profile.email.clone(),
            picture: user.profile.picture.clone(),
            height: user.profile.height,
            weight: user.profile.weight,
            created_at: user.created_at,
            updated_at: user.created_at,
        });
        Ok(id)
    }

    async fn update(&self, id: &Uuid, patch: &UpdateUser) -> Result<UserEntity, error::SystemError> {
        let mut state = self.state.lock().unwrap();
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == *id)
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        if let Some(name) = &patch.name {
            user.name = name.clone();
        }
        if let Some(email) = &patch.email {
            user.email = email.clone();
        }
        if let Some(picture) = &patch.picture {
            user.picture = picture.clone();
        }
        if let Some(height) = patch.height {
            user.height = height;
        }
        if let Some(weight) = patch.weight {
            user.weight = weight;
        }
        user.updated_at = patch.updated_at;
        Ok(user.clone())
    }

    async fn search_users(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<UserEntity>, error::SystemError> {
        let query = query.to_lowercase();
        let state = self.state.lock().unwrap();
        let mut users: Vec<UserEntity> = state
            .users
            .iter()
            .filter(|u| {
                u.name.to_lowercase().contains(&query) || u.user_key.to_lowercase().contains(&query)
            })
            .cloned()
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        users.truncate(limit.max(0) as usize);
        Ok(users)
    }
}

#[async_trait::async_trait]
impl ChatRepository for MemoryDb {
    async fn find_by_key(&self, chat_key: &str) -> Result<Option<ChatEntity>, error::SystemError> {
        Ok(self.state.lock().unwrap().chats.iter().find(|c| c.chat_key == chat_key).cloned())
    }

    async fn find_by_participants(
        &self,
        _type: &ChatType,
        participants: &[Uuid],
    ) -> Result<Option<ChatEntity>, error::SystemError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .chats
            .iter()
            .find(|c| c._type == *_type && c.participants == participants)
            .cloned())
    }

    async fn find_all_by_participant(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<ChatEntity>, error::SystemError> {
        let state = self.state.lock().unwrap();
        let chats: Vec<ChatEntity> =
            state.chats.iter().filter(|c| c.participants.contains(user_id)).cloned().collect();
        Ok(newest_first(chats.into_iter(), |c| c.updated_at))
    }

    async fn create(&self, chat: &NewChat) -> Result<ChatEntity, error::SystemError> {
        let entity = ChatEntity {
            id: Uuid::now_v7(),
            chat_key: chat.chat_key.clone(),
            sender_id: chat.sender_id,
            participants: chat.participants.clone(),
            _type: chat._type,
            last_message_id: None,
            created_at: chat.created_at,
            updated_at: chat.created_at,
        };
        self.state.lock().unwrap().chats.push(entity.clone());
        Ok(entity)
    }

    async fn update_last_message(
        &self,
        chat_id: &Uuid,
        last_message_id: Option<Uuid>,
        updated_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), error::SystemError> {
        let mut state = self.state.lock().unwrap();
        let chat = state
            .chats
            .iter_mut()
            .find(|c| c.id == *chat_id)
            .ok_or_else(|| error::SystemError::not_found("Chat not found"))?;
        chat.last_message_id = last_message_id;
        chat.updated_at = updated_at;
        Ok(())
    }

    async fn delete(&self, chat_id: &Uuid) -> Result<bool, error::SystemError> {
        let mut state = self.state.lock().unwrap();
        let before = state.chats.len();
        state.chats.retain(|c| c.id != *chat_id);
        Ok(state.chats.len() < before)
    }
}

#[async_trait::async_trait]
impl MessageRepository for MemoryDb {
    async fn create(&self, message: &InsertMessage) -> Result<MessageEntity, error::SystemError> {
        let entity = MessageEntity {
            id: Uuid::now_v7(),
            message_key: message.message_key.clone(),
            chat_id: message.chat_id,
            sender_id: message.sender_id,
            content: message.content.clone(),
            _type: message._type,
            media_url: message.media_url.clone(),
            reply_to: message.reply_to,
            is_ai: message.is_ai,
            created_at: message.created_at,
            updated_at: message.created_at,
        };
        self.state.lock().unwrap().messages.push(entity.clone());
        Ok(entity)
    }

    async fn find_by_key(
        &self,
        message_key: &str,
    ) -> Result<Option<MessageEntity>, error::SystemError> {
        let state = self.state.lock().unwrap();
        Ok(state.messages.iter().find(|m| m.message_key == message_key).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<MessageEntity>, error::SystemError> {
        let state = self.state.lock().unwrap();
        Ok(state.messages.iter().filter(|m| ids.contains(&m.id)).cloned().collect())
    }

    async fn find_by_query(
        &self,
        query: &MessageQuery,
    ) -> Result<Vec<MessageEntity>, error::SystemError> {
        let state = self.state.lock().unwrap();
        let mut matching: Vec<MessageEntity> = state
            .messages
            .iter()
            .filter(|m| m.chat_id == query.chat_id)
            .filter(|m| {
                query.before.map_or(true, |c| (m.created_at, m.id) < (c.created_at, c.id))
            })
            .cloned()
            .collect();
        matching.sort_by_key(|m| std::cmp::Reverse((m.created_at, m.id)));

        Ok(matching
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .collect())
    }

    async fn find_all_by_chat(
        &self,
        chat_id: &Uuid,
    ) -> Result<Vec<MessageEntity>, error::SystemError> {
        let state = self.state.lock().unwrap();
        Ok(state.messages.iter().filter(|m| m.chat_id == *chat_id).cloned().collect())
    }

    async fn find_latest_by_chat(
        &self,
        chat_id: &Uuid,
    ) -> Result<Option<MessageEntity>, error::SystemError> {
        let messages = self.find_all_by_chat(chat_id).await?;
        Ok(newest_first(messages.into_iter(), |m| m.created_at).into_iter().next())
    }

    async fn delete(&self, message_id: &Uuid) -> Result<bool, error::SystemError> {
        let mut state = self.state.lock().unwrap();
        let before = state.messages.len();
        state.messages.retain(|m| m.id != *message_id);
        Ok(state.messages.len() < before)
    }
}

#[async_trait::async_trait]
impl MediaRepository for MemoryDb {
    async fn create(&self, media: &InsertMedia) -> Result<MediaEntity, error::SystemError> {
        let details = &media.details;
        let entity = MediaEntity {
            id: Uuid::now_v7(),
            message_id: media.message_id,
            url: media.url.clone(),
            _type: media._type,
            size: details.size,
            mime_type: details.mime_type.clone(),
            duration: details.duration,
            file_name: details.file_name.clone(),
            width: details.width,
            height: details.height,
            resolution: details.resolution.clone(),
            bit_rate: details.bit_rate,
            created_at: media.created_at,
        };
        self.state.lock().unwrap().media.push(entity.clone());
        Ok(entity)
    }

    async fn delete_by_message(&self, message_id: &Uuid) -> Result<u64, error::SystemError> {
        let mut state = self.state.lock().unwrap();
        let before = state.media.len();
        state.media.retain(|m| m.message_id != *message_id);
        Ok((before - state.media.len()) as u64)
    }
}

#[async_trait::async_trait]
impl NotificationRepository for MemoryDb {
    async fn create(
        &self,
        notification: &InsertNotification,
    ) -> Result<NotificationEntity, error::SystemError> {
        let entity = NotificationEntity {
            id: Uuid::now_v7(),
            notification_key: notification.notification_key.clone(),
            user_key: notification.user_key.clone(),
            _type: notification._type,
            content: notification.content.clone(),
            is_read: false,
            created_at: notification.created_at,
            updated_at: notification.created_at,
        };
        self.state.lock().unwrap().notifications.push(entity.clone());
        Ok(entity)
    }

    async fn find_unread_by_user(
        &self,
        user_key: &str,
    ) -> Result<Vec<NotificationEntity>, error::SystemError> {
        let state = self.state.lock().unwrap();
        let unread: Vec<NotificationEntity> = state
            .notifications
            .iter()
            .filter(|n| n.user_key == user_key && !n.is_read)
            .cloned()
            .collect();
        Ok(newest_first(unread.into_iter(), |n| n.created_at))
    }

    async fn mark_as_read(
        &self,
        notification_key: &str,
        updated_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<bool, error::SystemError> {
        let mut state = self.state.lock().unwrap();
        match state.notifications.iter_mut().find(|n| n.notification_key == notification_key) {
            Some(notification) => {
                notification.is_read = true;
                notification.updated_at = updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_created_before(
        &self,
        cutoff: chrono::DateTime<chrono::Utc>,
    ) -> Result<u64, error::SystemError> {
        let mut state = self.state.lock().unwrap();
        let before = state.notifications.len();
        state.notifications.retain(|n| n.created_at >= cutoff);
        Ok((before - state.notifications.len()) as u64)
    }
}

#[async_trait::async_trait]
impl FileRepository for MemoryDb {
    async fn create(&self, file: &NewFile) -> Result<FileEntity, error::SystemError> {
        let entity = FileEntity {
            id: Uuid::now_v7(),
            file_key: file.file_key.clone(),
            user_id: file.user_id,
            file_name: file.file_name.clone(),
            file_url: file.file_url.clone(),
            mime_type: file.mime_type.clone(),
            size: file.size,
            created_at: file.created_at,
            updated_at: file.created_at,
        };
        self.state.lock().unwrap().files.push(entity.clone());
        Ok(entity)
    }
}

/// Cache without expiry.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }
}

#[async_trait::async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, error::SystemError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        _expiration: u64,
    ) -> Result<(), error::SystemError> {
        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), error::SystemError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
