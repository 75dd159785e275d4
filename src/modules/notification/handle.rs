use actix_web::{get, patch, post, web, HttpRequest};

use crate::api::{error, success};
use crate::middlewares::acting_as;
use crate::modules::notification::{model, service::NotificationService};
use crate::utils::ValidatedJson;
use crate::ENV;

#[post("")]
pub async fn send_notification(
    notification_service: web::Data<NotificationService>,
    notification_data: ValidatedJson<model::SendNotificationModel>,
) -> Result<success::Success<model::NotificationCreatedResponse>, error::Error> {
    let notification = notification_service.send_notification(notification_data.0).await?;
    Ok(success::Success::created(Some(model::NotificationCreatedResponse {
        id: notification.id,
        notification_id: notification.notification_key,
    }))
    .message("Notification sent successfully"))
}

#[get("/{user_id}")]
pub async fn get_notifications(
    req: HttpRequest,
    notification_service: web::Data<NotificationService>,
    user_id: web::Path<String>,
) -> Result<success::Success<Vec<model::NotificationResponse>>, error::Error> {
    acting_as(&req, &user_id)?;
    let notifications = notification_service.get_notifications(&user_id).await?;
    Ok(success::Success::ok(Some(notifications)).message("Notifications retrieved successfully"))
}

#[patch("/{notification_id}/read")]
pub async fn mark_as_read(
    notification_service: web::Data<NotificationService>,
    notification_id: web::Path<String>,
) -> Result<success::Success<()>, error::Error> {
    notification_service.mark_as_read(&notification_id).await?;
    Ok(success::Success::no_content())
}

#[post("")]
pub async fn expire_notifications(
    notification_service: web::Data<NotificationService>,
    body: ValidatedJson<model::ExpireNotificationsModel>,
) -> Result<success::Success<model::ExpiredResponse>, error::Error> {
    let days = body.0.days.unwrap_or(ENV.notification_expiry_days);
    let deleted = notification_service.expire_old_notifications(days).await?;
    Ok(success::Success::ok(Some(model::ExpiredResponse { deleted }))
        .message("Expired notifications removed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{claims_from_header, MemoryDb};
    use actix_web::{http::StatusCode, middleware::from_fn, test, App};
    use std::sync::Arc;

    fn list_as(caller: &str, role: &str) -> test::TestRequest {
        test::TestRequest::get()
            .uri("/api/notifications/u1")
            .insert_header(("X-Test-User", caller))
            .insert_header(("X-Test-Role", role))
    }

    #[actix_web::test]
    async fn test_notifications_are_listed_for_owner_or_admin() {
        let db = Arc::new(MemoryDb::default());
        db.seed_notification("u1", chrono::Utc::now());
        let notifications = NotificationService::with_dependencies(db, None);
        let app = test::init_service(
            App::new().app_data(web::Data::new(notifications)).service(
                web::scope("/api")
                    .wrap(from_fn(claims_from_header))
                    .configure(crate::modules::notification::route::configure),
            ),
        )
        .await;

        let res = test::call_service(&app, list_as("u2", "user").to_request()).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = test::call_service(&app, list_as("u1", "user").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = test::call_service(&app, list_as("ops", "admin").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
