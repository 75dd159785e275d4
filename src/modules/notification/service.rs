use actix::Addr;
use log::info;
use std::sync::Arc;

use crate::api::error;
use crate::modules::notification::model::{
    InsertNotification, NotificationResponse, SendNotificationModel,
};
use crate::modules::notification::repository::NotificationRepository;
use crate::modules::notification::schema::NotificationEntity;
use crate::modules::relay::{events::NotifyUser, server::NotificationRelay};
use crate::utils::new_key;

#[derive(Clone)]
pub struct NotificationService {
    repo: Arc<dyn NotificationRepository + Send + Sync>,
    relay: Option<Addr<NotificationRelay>>,
}

impl NotificationService {
    pub fn with_dependencies(
        repo: Arc<dyn NotificationRepository + Send + Sync>,
        relay: Option<Addr<NotificationRelay>>,
    ) -> Self {
        info!("NotificationService initialized with dependencies");
        NotificationService { repo, relay }
    }

    pub async fn send_notification(
        &self,
        model: SendNotificationModel,
    ) -> Result<NotificationEntity, error::SystemError> {
        let notification = self
            .repo
            .create(&InsertNotification {
                notification_key: new_key(),
                user_key: model.user_id,
                _type: model._type,
                content: model.content,
                created_at: chrono::Utc::now(),
            })
            .await?;

        if let Some(relay) = &self.relay {
            let payload = serde_json::json!({
                "type": "notification",
                "notification": NotificationResponse::from(notification.clone()),
            });
            relay.do_send(NotifyUser { user_key: notification.user_key.clone(), payload });
        }

        info!("Notification {} recorded for {}", notification.id, notification.user_key);
        Ok(notification)
    }

    pub async fn get_notifications(
        &self,
        user_key: &str,
    ) -> Result<Vec<NotificationResponse>, error::SystemError> {
        let notifications = self.repo.find_unread_by_user(user_key).await?;
        Ok(notifications.into_iter().map(NotificationResponse::from).collect())
    }

    /// Missing notifications are ignored.
    pub async fn mark_as_read(&self, notification_key: &str) -> Result<(), error::SystemError> {
        if !self.repo.mark_as_read(notification_key, chrono::Utc::now()).await? {
            info!("Notification {} not found, nothing to mark", notification_key);
        }
        Ok(())
    }

    pub async fn expire_old_notifications(&self, days: u32) -> Result<u64, error::SystemError> {
        self.expire_relative_to(days, chrono::Utc::now()).await
    }

    async fn expire_relative_to(
        &self,
        days: u32,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<u64, error::SystemError> {
        let cutoff = chrono::Duration::try_days(i64::from(days))
            .and_then(|age| now.checked_sub_signed(age))
            .ok_or_else(|| error::SystemError::bad_request("Expiry window is too large"))?;
        let deleted = self.repo.delete_created_before(cutoff).await?;
        info!("Expired {} notifications older than {} days", deleted, days);
        Ok(deleted)
    }
}
