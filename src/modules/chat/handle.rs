use actix_web::{delete, get, post, web, HttpRequest};

use crate::api::{error, success};
use crate::middlewares::acting_as;
use crate::modules::chat::{model, service::ChatService};
use crate::utils::ValidatedJson;

#[post("")]
pub async fn get_or_create_chat(
    req: HttpRequest,
    chat_service: web::Data<ChatService>,
    chat_data: ValidatedJson<model::GetOrCreateChatModel>,
) -> Result<success::Success<model::ChatCreatedResponse>, error::Error> {
    acting_as(&req, &chat_data.0.sender_id)?;
    let chat = chat_service.get_or_create_chat(chat_data.0).await?;
    Ok(success::Success::ok(Some(model::ChatCreatedResponse {
        id: chat.id,
        chat_id: chat.chat_key,
    }))
    .message("Chat retrieved successfully"))
}

#[get("/user/{user_id}")]
pub async fn get_chats(
    req: HttpRequest,
    chat_service: web::Data<ChatService>,
    user_id: web::Path<String>,
) -> Result<success::Success<Vec<model::ChatDetail>>, error::Error> {
    acting_as(&req, &user_id)?;
    let chats = chat_service.get_chats(&user_id).await?;
    Ok(success::Success::ok(Some(chats)).message("Chats retrieved successfully"))
}

#[get("/{chat_id}")]
pub async fn get_chat(
    chat_service: web::Data<ChatService>,
    chat_id: web::Path<String>,
) -> Result<success::Success<model::ChatDetail>, error::Error> {
    let chat = chat_service.get_chat(&chat_id).await?;
    Ok(success::Success::ok(Some(chat)).message("Chat retrieved successfully"))
}

#[delete("/{chat_id}")]
pub async fn delete_chat(
    chat_service: web::Data<ChatService>,
    chat_id: web::Path<String>,
) -> Result<success::Success<()>, error::Error> {
    chat_service.delete_chat(&chat_id).await?;
    Ok(success::Success::no_content())
}
