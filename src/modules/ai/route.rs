use crate::modules::ai::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/ai/conversations")
            .service(create_conversation)
            .service(get_or_create_conversation)
            .service(continue_conversation),
    );
}
