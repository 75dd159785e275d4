use crate::{
    api::error,
    modules::notification::{model::InsertNotification, schema::NotificationEntity},
};

#[async_trait::async_trait]
pub trait NotificationRepository {
    async fn create(
        &self,
        notification: &InsertNotification,
    ) -> Result<NotificationEntity, error::SystemError>;

    /// Unread notifications of a user, newest first.
    async fn find_unread_by_user(
        &self,
        user_key: &str,
    ) -> Result<Vec<NotificationEntity>, error::SystemError>;

    /// Returns whether a notification with this key existed.
    async fn mark_as_read(
        &self,
        notification_key: &str,
        updated_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<bool, error::SystemError>;

    /// Deletes notifications created strictly before `cutoff`.
    async fn delete_created_before(
        &self,
        cutoff: chrono::DateTime<chrono::Utc>,
    ) -> Result<u64, error::SystemError>;
}
