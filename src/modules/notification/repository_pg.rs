use uuid::Uuid;

use crate::{
    api::error,
    modules::notification::{
        model::InsertNotification, repository::NotificationRepository, schema::NotificationEntity,
    },
};

#[derive(Clone)]
pub struct NotificationRepositoryPg {
    pool: sqlx::PgPool,
}

impl NotificationRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl NotificationRepository for NotificationRepositoryPg {
    async fn create(
        &self,
        notification: &InsertNotification,
    ) -> Result<NotificationEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let notification = sqlx::query_as::<_, NotificationEntity>(
            r#"
            INSERT INTO notifications
                (id, notification_key, user_key, type, content, is_read, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, FALSE, $6, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&notification.notification_key)
        .bind(&notification.user_key)
        .bind(notification._type)
        .bind(&notification.content)
        .bind(notification.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    async fn find_unread_by_user(
        &self,
        user_key: &str,
    ) -> Result<Vec<NotificationEntity>, error::SystemError> {
        let notifications = sqlx::query_as::<_, NotificationEntity>(
            r#"
            SELECT *
            FROM notifications
            WHERE user_key = $1
            AND is_read = FALSE
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_key)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    async fn mark_as_read(
        &self,
        notification_key: &str,
        updated_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<bool, error::SystemError> {
        let rows = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, updated_at = $2 WHERE notification_key = $1",
        )
        .bind(notification_key)
        .bind(updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }

    async fn delete_created_before(
        &self,
        cutoff: chrono::DateTime<chrono::Utc>,
    ) -> Result<u64, error::SystemError> {
        let rows = sqlx::query("DELETE FROM notifications WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows)
    }
}
