use actix_web::{delete, get, post, web, HttpRequest};

use crate::api::{error, success};
use crate::middlewares::acting_as;
use crate::modules::message::{model, service::MessageService};
use crate::utils::{ValidatedJson, ValidatedQuery};

#[post("")]
pub async fn send_message(
    req: HttpRequest,
    message_service: web::Data<MessageService>,
    message_data: ValidatedJson<model::SendMessageModel>,
) -> Result<success::Success<model::MessageSentResponse>, error::Error> {
    acting_as(&req, &message_data.0.sender_id)?;
    let message = message_service.send_message(message_data.0).await?;
    Ok(success::Success::created(Some(model::MessageSentResponse {
        id: message.id,
        message_id: message.message_key,
    }))
    .message("Message sent successfully"))
}

#[get("/{chat_id}")]
pub async fn get_messages(
    message_service: web::Data<MessageService>,
    chat_id: web::Path<String>,
    query: ValidatedQuery<model::GetMessagesQuery>,
) -> Result<success::Success<model::GetMessagesResponse>, error::Error> {
    let messages = message_service.get_messages(&chat_id, query.0).await?;
    Ok(success::Success::ok(Some(messages)).message("Messages retrieved successfully"))
}

#[delete("/{chat_id}/{message_id}")]
pub async fn delete_message(
    message_service: web::Data<MessageService>,
    path: web::Path<(String, String)>,
) -> Result<success::Success<()>, error::Error> {
    let (chat_id, message_id) = path.into_inner();
    message_service.delete_message(&message_id, &chat_id).await?;
    Ok(success::Success::no_content())
}
