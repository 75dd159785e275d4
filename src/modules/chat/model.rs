use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::chat::schema::ChatType;

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GetOrCreateChatModel {
    #[validate(length(min = 1, message = "Sender id cannot be empty"))]
    pub sender_id: String,
    #[validate(length(min = 1, message = "At least one participant is required"))]
    pub participant_ids: Vec<String>,
    #[serde(rename = "type")]
    pub _type: ChatType,
}

#[derive(Debug, Clone)]
pub struct NewChat {
    pub chat_key: String,
    pub sender_id: Uuid,
    pub participants: Vec<Uuid>,
    pub _type: ChatType,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatCreatedResponse {
    pub id: Uuid,
    pub chat_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInfo {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessageInfo {
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// External key of the sender; `None` for AI-authored messages.
    pub sender_id: Option<String>,
    pub is_ai: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatDetail {
    pub id: Uuid,
    pub chat_id: String,
    #[serde(rename = "type")]
    pub _type: ChatType,
    pub participants: Vec<ParticipantInfo>,
    pub last_message: Option<LastMessageInfo>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
