use crate::modules::user::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/users")
            .service(create_user)
            .service(search_users)
            .service(get_user)
            .service(update_user),
    );
}
