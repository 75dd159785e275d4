use crate::modules::chat::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/chats")
            .service(get_or_create_chat)
            .service(get_chats)
            .service(get_chat)
            .service(delete_chat),
    );
}
