use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "chat_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    Private,
    Group,
}

#[derive(Debug, Clone, FromRow)]
pub struct ChatEntity {
    pub id: Uuid,
    pub chat_key: String,
    pub sender_id: Uuid,
    /// Canonical form: sorted and deduplicated.
    pub participants: Vec<Uuid>,
    #[sqlx(rename = "type")]
    pub _type: ChatType,
    pub last_message_id: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ChatEntity {
    pub fn has_participant(&self, user_id: &Uuid) -> bool {
        self.participants.binary_search(user_id).is_ok()
    }
}
