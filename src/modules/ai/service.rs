use log::info;
use std::sync::Arc;

use crate::api::error;
use crate::constants::DEFAULT_AI_NAME;
use crate::modules::ai::generator::TextGenerator;
use crate::modules::ai::model::{AiConversation, AiOutcome, AiTurn};
use crate::modules::chat::{
    model::NewChat,
    repository::ChatRepository,
    schema::{ChatEntity, ChatType},
};
use crate::modules::message::{schema::MessageType, service::MessageService};
use crate::modules::user::{repository::UserRepository, schema::UserEntity};
use crate::utils::new_key;

fn welcome_prompt(ai_name: &str) -> String {
    format!("You're {ai_name}, an AI assistant. Welcome the user warmly.")
}

fn turn_prompt(user_message: &str) -> String {
    format!("User: {user_message}\nAssistant:")
}

/// Assistant chats are private chats whose only participant is their sender.
#[derive(Clone)]
pub struct AiService {
    chat_repo: Arc<dyn ChatRepository + Send + Sync>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
    message_service: MessageService,
    generator: Arc<dyn TextGenerator + Send + Sync>,
}

impl AiService {
    pub fn with_dependencies(
        chat_repo: Arc<dyn ChatRepository + Send + Sync>,
        user_repo: Arc<dyn UserRepository + Send + Sync>,
        message_service: MessageService,
        generator: Arc<dyn TextGenerator + Send + Sync>,
    ) -> Self {
        info!("AiService initialized with dependencies");
        AiService { chat_repo, user_repo, message_service, generator }
    }

    async fn find_user(&self, user_key: &str) -> Result<UserEntity, error::SystemError> {
        self.user_repo
            .find_by_key(user_key)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))
    }

    pub async fn create_conversation(
        &self,
        user_key: &str,
        ai_name: Option<&str>,
    ) -> Result<AiConversation, error::SystemError> {
        let user = self.find_user(user_key).await?;
        self.create_for(&user, ai_name.unwrap_or(DEFAULT_AI_NAME)).await
    }

    async fn create_for(
        &self,
        user: &UserEntity,
        ai_name: &str,
    ) -> Result<AiConversation, error::SystemError> {
        let chat = self
            .chat_repo
            .create(&NewChat {
                chat_key: new_key(),
                sender_id: user.id,
                participants: vec![user.id],
                _type: ChatType::Private,
                created_at: chrono::Utc::now(),
            })
            .await?;

        let reply = self.generator.generate(&welcome_prompt(ai_name)).await?;
        let welcome =
            self.message_service.append(&chat.id, None, reply, MessageType::Text, true).await?;

        info!("Assistant chat {} created for {}", chat.id, user.user_key);
        Ok(AiConversation { chat, welcome })
    }

    pub async fn continue_conversation(
        &self,
        chat_key: &str,
        user_message: &str,
    ) -> Result<AiTurn, error::SystemError> {
        let chat = self
            .chat_repo
            .find_by_key(chat_key)
            .await?
            .ok_or_else(|| error::SystemError::not_found("AI chat not found"))?;

        self.reply_in(&chat, user_message).await
    }

    async fn reply_in(
        &self,
        chat: &ChatEntity,
        user_message: &str,
    ) -> Result<AiTurn, error::SystemError> {
        if user_message.trim().is_empty() {
            return Err(error::SystemError::bad_request("Message cannot be empty"));
        }

        let user_message = self
            .message_service
            .append(&chat.id, Some(chat.sender_id), user_message.to_string(), MessageType::Text, false)
            .await?;

        // the user's message stays stored if generation fails
        let reply = self.generator.generate(&turn_prompt(&user_message.content)).await?;

        let ai_message = self
            .message_service
            .append(&chat.id, None, reply.clone(), MessageType::Text, true)
            .await?;

        Ok(AiTurn { user_message, ai_message, reply })
    }

    pub async fn get_or_create_conversation(
        &self,
        user_key: &str,
        user_message: Option<&str>,
    ) -> Result<AiOutcome, error::SystemError> {
        let user = self.find_user(user_key).await?;

        let existing = self
            .chat_repo
            .find_by_participants(&ChatType::Private, &[user.id])
            .await?
            .filter(|chat| chat.sender_id == user.id);

        // a blank message counts as no message
        let user_message = user_message.filter(|m| !m.trim().is_empty());

        match (existing, user_message) {
            (Some(chat), Some(message)) => Ok(AiOutcome::Replied(self.reply_in(&chat, message).await?)),
            (Some(chat), None) => Ok(AiOutcome::Existing(chat)),
            (None, _) => Ok(AiOutcome::Created(self.create_for(&user, DEFAULT_AI_NAME).await?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::MemoryDb;
    use std::sync::Mutex;

    /// Replies with a fixed text and records every prompt.
    #[derive(Default)]
    struct ScriptedGenerator {
        prompts: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, error::SystemError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail {
                return Err(error::SystemError::external("Text generation failed"));
            }
            Ok(format!("reply #{}", self.prompts.lock().unwrap().len()))
        }
    }

    fn service(db: &Arc<MemoryDb>, generator: Arc<ScriptedGenerator>) -> AiService {
        let messages =
            MessageService::with_dependencies(db.clone(), db.clone(), db.clone(), db.clone());
        AiService::with_dependencies(db.clone(), db.clone(), messages, generator)
    }

    #[actix_web::test]
    async fn test_create_conversation_stores_ai_welcome() {
        let db = Arc::new(MemoryDb::default());
        let user = db.seed_user("u1", "Alice");
        let generator = Arc::new(ScriptedGenerator::default());
        let svc = service(&db, generator.clone());

        let created = svc.create_conversation("u1", Some("Nova")).await.unwrap();

        assert_eq!(created.chat.participants, vec![user.id]);
        assert_eq!(created.chat.sender_id, user.id);
        assert!(created.welcome.is_ai);
        assert_eq!(created.welcome.sender_id, None);
        assert_eq!(created.welcome.content, "reply #1");
        assert_eq!(
            generator.prompts.lock().unwrap()[0],
            "You're Nova, an AI assistant. Welcome the user warmly."
        );
        assert_eq!(db.chat(&created.chat.id).unwrap().last_message_id, Some(created.welcome.id));
    }

    #[actix_web::test]
    async fn test_create_for_unknown_user_is_not_found() {
        let db = Arc::new(MemoryDb::default());
        let svc = service(&db, Arc::new(ScriptedGenerator::default()));
        let err = svc.create_conversation("ghost", None).await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));
        assert_eq!(db.chat_count(), 0);
    }

    #[actix_web::test]
    async fn test_turn_appends_user_and_ai_messages() {
        let db = Arc::new(MemoryDb::default());
        let user = db.seed_user("u1", "Alice");
        let generator = Arc::new(ScriptedGenerator::default());
        let svc = service(&db, generator.clone());
        let created = svc.create_conversation("u1", None).await.unwrap();

        let turn = svc.continue_conversation(&created.chat.chat_key, "How tall is K2?").await.unwrap();

        assert_eq!(turn.user_message.sender_id, Some(user.id));
        assert!(!turn.user_message.is_ai);
        assert!(turn.ai_message.is_ai);
        assert_eq!(turn.reply, "reply #2");
        assert_eq!(generator.prompts.lock().unwrap()[1], "User: How tall is K2?\nAssistant:");
        assert_eq!(db.chat(&created.chat.id).unwrap().last_message_id, Some(turn.ai_message.id));
        assert_eq!(db.message_count(), 3);
    }

    #[actix_web::test]
    async fn test_turn_on_unknown_chat_is_not_found() {
        let db = Arc::new(MemoryDb::default());
        let svc = service(&db, Arc::new(ScriptedGenerator::default()));
        let err = svc.continue_conversation("missing", "hello").await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));
    }

    #[actix_web::test]
    async fn test_generator_failure_keeps_user_message() {
        let db = Arc::new(MemoryDb::default());
        let user = db.seed_user("u1", "Alice");
        let chat = db.seed_ai_chat(&user);
        let svc = service(&db, Arc::new(ScriptedGenerator { fail: true, ..Default::default() }));

        let err = svc.continue_conversation(&chat.chat_key, "hello").await.unwrap_err();
        assert!(matches!(err, error::SystemError::ExternalService(_)));
        assert_eq!(db.message_count(), 1);
    }

    #[actix_web::test]
    async fn test_get_or_create_resolves_each_outcome() {
        let db = Arc::new(MemoryDb::default());
        db.seed_user("u1", "Alice");
        let svc = service(&db, Arc::new(ScriptedGenerator::default()));

        let created = match svc.get_or_create_conversation("u1", None).await.unwrap() {
            AiOutcome::Created(created) => created,
            other => panic!("expected a new conversation, got {other:?}"),
        };

        match svc.get_or_create_conversation("u1", None).await.unwrap() {
            AiOutcome::Existing(chat) => assert_eq!(chat.id, created.chat.id),
            other => panic!("expected the existing chat, got {other:?}"),
        }

        match svc.get_or_create_conversation("u1", Some("hi")).await.unwrap() {
            AiOutcome::Replied(turn) => {
                assert_eq!(turn.user_message.chat_id, created.chat.id);
                assert_eq!(turn.user_message.content, "hi");
            }
            other => panic!("expected a reply, got {other:?}"),
        }

        assert_eq!(db.chat_count(), 1);
    }

    #[actix_web::test]
    async fn test_get_or_create_treats_blank_message_as_absent() {
        let db = Arc::new(MemoryDb::default());
        let user = db.seed_user("u1", "Alice");
        let chat = db.seed_ai_chat(&user);
        let generator = Arc::new(ScriptedGenerator::default());
        let svc = service(&db, generator.clone());

        for blank in ["", "   "] {
            match svc.get_or_create_conversation("u1", Some(blank)).await.unwrap() {
                AiOutcome::Existing(existing) => assert_eq!(existing.id, chat.id),
                other => panic!("expected the existing chat, got {other:?}"),
            }
        }

        assert_eq!(db.message_count(), 0);
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_get_or_create_ignores_regular_private_chats() {
        let db = Arc::new(MemoryDb::default());
        db.seed_chat(ChatType::Private, &["u1", "u2"]);
        let svc = service(&db, Arc::new(ScriptedGenerator::default()));

        let outcome = svc.get_or_create_conversation("u1", Some("hi")).await.unwrap();
        assert!(matches!(outcome, AiOutcome::Created(_)));
        assert_eq!(db.chat_count(), 2);
    }
}
