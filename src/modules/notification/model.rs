use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::notification::schema::{NotificationEntity, NotificationType};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationModel {
    #[validate(length(min = 1, message = "User id cannot be empty"))]
    pub user_id: String,
    #[serde(rename = "type")]
    pub _type: NotificationType,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: String,
}

#[derive(Deserialize, Validate)]
pub struct ExpireNotificationsModel {
    #[validate(range(max = 3650, message = "Days cannot exceed 3650"))]
    pub days: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct InsertNotification {
    pub notification_key: String,
    pub user_key: String,
    pub _type: NotificationType,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationCreatedResponse {
    pub id: Uuid,
    pub notification_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiredResponse {
    pub deleted: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: Uuid,
    pub notification_id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub _type: NotificationType,
    pub content: String,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<NotificationEntity> for NotificationResponse {
    fn from(entity: NotificationEntity) -> Self {
        NotificationResponse {
            id: entity.id,
            notification_id: entity.notification_key,
            user_id: entity.user_key,
            _type: entity._type,
            content: entity.content,
            is_read: entity.is_read,
            created_at: entity.created_at,
        }
    }
}
