use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "message_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Text,
    Image,
    Video,
    Audio,
    File,
}

impl MessageType {
    pub fn media_type(&self) -> Option<MediaType> {
        match self {
            MessageType::Text => None,
            MessageType::Image => Some(MediaType::Image),
            MessageType::Video => Some(MediaType::Video),
            MessageType::Audio => Some(MediaType::Audio),
            MessageType::File => Some(MediaType::File),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "media_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Audio,
    File,
}

impl MediaType {
    pub fn requires_duration(&self) -> bool {
        matches!(self, MediaType::Audio | MediaType::Video)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct MessageEntity {
    pub id: Uuid,
    pub message_key: String,
    pub chat_id: Uuid,
    /// `None` for AI-authored messages.
    pub sender_id: Option<Uuid>,
    pub content: String,
    #[sqlx(rename = "type")]
    pub _type: MessageType,
    pub media_url: Option<String>,
    pub reply_to: Option<Uuid>,
    pub is_ai: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct MediaEntity {
    pub id: Uuid,
    pub message_id: Uuid,
    pub url: String,
    #[sqlx(rename = "type")]
    pub _type: MediaType,
    pub size: Option<i64>,
    pub mime_type: String,
    pub duration: Option<f64>,
    pub file_name: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub resolution: Option<String>,
    pub bit_rate: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
