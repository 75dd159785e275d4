use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::chat::schema::ChatEntity;
use crate::modules::message::schema::MessageEntity;

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAiConversationModel {
    #[validate(length(min = 1, message = "User id cannot be empty"))]
    pub user_id: String,
    #[validate(length(min = 1, max = 64, message = "AI name must be 1 to 64 characters"))]
    pub ai_name: Option<String>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AiMessageModel {
    #[validate(length(min = 1, message = "Message cannot be empty"))]
    pub user_message: String,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResolveAiConversationModel {
    #[validate(length(min = 1, message = "User id cannot be empty"))]
    pub user_id: String,
    pub user_message: Option<String>,
}

/// A freshly created assistant chat and its welcome message.
#[derive(Debug, Clone)]
pub struct AiConversation {
    pub chat: ChatEntity,
    pub welcome: MessageEntity,
}

/// One user turn and the generated reply.
#[derive(Debug, Clone)]
pub struct AiTurn {
    pub user_message: MessageEntity,
    pub ai_message: MessageEntity,
    pub reply: String,
}

#[derive(Debug, Clone)]
pub enum AiOutcome {
    Created(AiConversation),
    Existing(ChatEntity),
    Replied(AiTurn),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiConversationResponse {
    pub id: Uuid,
    pub chat_id: String,
    pub welcome_message: String,
}

impl From<AiConversation> for AiConversationResponse {
    fn from(conversation: AiConversation) -> Self {
        AiConversationResponse {
            id: conversation.chat.id,
            chat_id: conversation.chat.chat_key,
            welcome_message: conversation.welcome.content,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiTurnResponse {
    pub user_message_id: Uuid,
    pub ai_message_id: Uuid,
    pub ai_response: String,
}

impl From<AiTurn> for AiTurnResponse {
    fn from(turn: AiTurn) -> Self {
        AiTurnResponse {
            user_message_id: turn.user_message.id,
            ai_message_id: turn.ai_message.id,
            ai_response: turn.reply,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum AiOutcomeResponse {
    Created(AiConversationResponse),
    #[serde(rename_all = "camelCase")]
    Existing { id: Uuid, chat_id: String },
    Replied(AiTurnResponse),
}

impl From<AiOutcome> for AiOutcomeResponse {
    fn from(outcome: AiOutcome) -> Self {
        match outcome {
            AiOutcome::Created(conversation) => AiOutcomeResponse::Created(conversation.into()),
            AiOutcome::Existing(chat) => {
                AiOutcomeResponse::Existing { id: chat.id, chat_id: chat.chat_key }
            }
            AiOutcome::Replied(turn) => AiOutcomeResponse::Replied(turn.into()),
        }
    }
}
