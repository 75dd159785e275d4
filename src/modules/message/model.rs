use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::message::schema::{MediaType, MessageEntity, MessageType};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MediaDetailsModel {
    #[validate(length(min = 1, message = "Mime type cannot be empty"))]
    pub mime_type: String,
    #[validate(length(min = 1, message = "File name cannot be empty"))]
    pub file_name: String,
    #[validate(range(min = 0, message = "Size cannot be negative"))]
    pub size: Option<i64>,
    #[validate(range(min = 0.0, message = "Duration cannot be negative"))]
    pub duration: Option<f64>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub resolution: Option<String>,
    pub bit_rate: Option<i32>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageModel {
    #[validate(length(min = 1, message = "Chat id cannot be empty"))]
    pub chat_id: String,
    #[validate(length(min = 1, message = "Sender id cannot be empty"))]
    pub sender_id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub _type: MessageType,
    #[validate(url(message = "Media URL must be a valid URL"))]
    pub media_url: Option<String>,
    /// External key of the message being replied to.
    pub reply_to: Option<String>,
    #[validate(nested)]
    pub media: Option<MediaDetailsModel>,
}

#[derive(Deserialize, Validate)]
pub struct GetMessagesQuery {
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    #[validate(range(min = 0, message = "Offset cannot be negative"))]
    pub offset: Option<i64>,
    /// Cursor returned by a previous page.
    pub before: Option<String>,
}

/// Position of the last message on a page. Encoded as `<rfc3339>_<id>` so
/// messages sharing a timestamp are still ordered by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageCursor {
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub id: Uuid,
}

impl MessageCursor {
    pub fn encode(&self) -> String {
        format!(
            "{}_{}",
            self.created_at.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true),
            self.id
        )
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let (created_at, id) = raw.split_once('_')?;
        Some(MessageCursor {
            created_at: chrono::DateTime::parse_from_rfc3339(created_at)
                .ok()?
                .with_timezone(&chrono::Utc),
            id: Uuid::parse_str(id).ok()?,
        })
    }
}

impl From<&MessageEntity> for MessageCursor {
    fn from(message: &MessageEntity) -> Self {
        MessageCursor { created_at: message.created_at, id: message.id }
    }
}

#[derive(Debug, Clone)]
pub struct InsertMessage {
    pub message_key: String,
    pub chat_id: Uuid,
    pub sender_id: Option<Uuid>,
    pub content: String,
    pub _type: MessageType,
    pub media_url: Option<String>,
    pub reply_to: Option<Uuid>,
    pub is_ai: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct InsertMedia {
    pub message_id: Uuid,
    pub url: String,
    pub _type: MediaType,
    pub details: MediaDetailsModel,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Page request, ordered by creation time descending at the source.
#[derive(Debug, Clone)]
pub struct MessageQuery {
    pub chat_id: Uuid,
    pub before: Option<MessageCursor>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSentResponse {
    pub id: Uuid,
    pub message_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: Uuid,
    pub message_id: String,
    pub chat_id: Uuid,
    pub sender_id: Option<Uuid>,
    pub content: String,
    #[serde(rename = "type")]
    pub _type: MessageType,
    pub media_url: Option<String>,
    pub reply_to: Option<Uuid>,
    pub is_ai: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<MessageEntity> for MessageResponse {
    fn from(entity: MessageEntity) -> Self {
        MessageResponse {
            id: entity.id,
            message_id: entity.message_key,
            chat_id: entity.chat_id,
            sender_id: entity.sender_id,
            content: entity.content,
            _type: entity._type,
            media_url: entity.media_url,
            reply_to: entity.reply_to,
            is_ai: entity.is_ai,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMessagesResponse {
    pub messages: Vec<MessageResponse>,
    pub cursor: Option<String>,
}
