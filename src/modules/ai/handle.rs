use actix_web::{post, web, HttpRequest};

use crate::api::{error, success};
use crate::middlewares::acting_as;
use crate::modules::ai::{model, service::AiService};
use crate::utils::ValidatedJson;

#[post("")]
pub async fn create_conversation(
    req: HttpRequest,
    ai_service: web::Data<AiService>,
    body: ValidatedJson<model::CreateAiConversationModel>,
) -> Result<success::Success<model::AiConversationResponse>, error::Error> {
    let body = body.0;
    acting_as(&req, &body.user_id)?;
    let conversation = ai_service.create_conversation(&body.user_id, body.ai_name.as_deref()).await?;
    Ok(success::Success::created(Some(conversation.into()))
        .message("AI conversation created successfully"))
}

#[post("/resolve")]
pub async fn get_or_create_conversation(
    req: HttpRequest,
    ai_service: web::Data<AiService>,
    body: ValidatedJson<model::ResolveAiConversationModel>,
) -> Result<success::Success<model::AiOutcomeResponse>, error::Error> {
    let body = body.0;
    acting_as(&req, &body.user_id)?;
    let outcome =
        ai_service.get_or_create_conversation(&body.user_id, body.user_message.as_deref()).await?;
    Ok(success::Success::ok(Some(outcome.into())).message("AI conversation resolved"))
}

#[post("/{chat_id}/messages")]
pub async fn continue_conversation(
    ai_service: web::Data<AiService>,
    chat_id: web::Path<String>,
    body: ValidatedJson<model::AiMessageModel>,
) -> Result<success::Success<model::AiTurnResponse>, error::Error> {
    let turn = ai_service.continue_conversation(&chat_id, &body.0.user_message).await?;
    Ok(success::Success::created(Some(turn.into())).message("AI replied successfully"))
}
