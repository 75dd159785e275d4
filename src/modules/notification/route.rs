use crate::middlewares::authorization;
use crate::modules::notification::handle::*;
use crate::modules::user::schema::UserRole;
use actix_web::middleware::from_fn;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/notifications")
            .service(
                scope("/expire")
                    .wrap(from_fn(authorization(vec![UserRole::Admin])))
                    .service(expire_notifications),
            )
            .service(send_notification)
            .service(get_notifications)
            .service(mark_as_read),
    );
}
