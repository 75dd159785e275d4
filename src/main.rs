use actix::Actor;
use actix_cors::Cors;
use actix_web::{
    self, App, HttpServer,
    middleware::{Logger, from_fn},
    web,
};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use crate::{
    configs::{RedisCache, connect_database},
    middlewares::authentication,
    modules::{
        ai::{generator::OpenAiGenerator, service::AiService},
        chat::{repository_pg::ChatRepositoryPg, service::ChatService},
        message::{
            repository_pg::{MediaRepositoryPg, MessageRepositoryPg},
            service::MessageService,
        },
        notification::{repository_pg::NotificationRepositoryPg, service::NotificationService},
        relay::{handler::relay_handler, server::NotificationRelay},
        upload::{
            model::UploadConfig, repository_pg::FileRepositoryPg, service::UploadService,
            storage::LocalObjectStorage,
        },
        user::{repository_pg::UserRepositoryPg, service::UserService},
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    let redis_pool =
        RedisCache::new().await.map_err(|_| std::io::Error::other("Redis connection error"))?;

    let user_repo = Arc::new(UserRepositoryPg::new(db_pool.clone()));
    let chat_repo = Arc::new(ChatRepositoryPg::new(db_pool.clone()));
    let message_repo = Arc::new(MessageRepositoryPg::new(db_pool.clone()));
    let media_repo = Arc::new(MediaRepositoryPg::new(db_pool.clone()));
    let notification_repo = Arc::new(NotificationRepositoryPg::new(db_pool.clone()));
    let file_repo = Arc::new(FileRepositoryPg::new(db_pool.clone()));

    let relay = NotificationRelay::new().start();

    let user_service = UserService::with_dependencies(user_repo.clone(), Arc::new(redis_pool));
    let chat_service = ChatService::with_dependencies(
        chat_repo.clone(),
        user_repo.clone(),
        message_repo.clone(),
        media_repo.clone(),
    );
    let message_service = MessageService::with_dependencies(
        message_repo,
        media_repo,
        chat_repo.clone(),
        user_repo.clone(),
    );
    let ai_service = AiService::with_dependencies(
        chat_repo,
        user_repo.clone(),
        message_service.clone(),
        Arc::new(OpenAiGenerator::new(
            &ENV.openai_api_key,
            ENV.openai_base_url.as_deref(),
            &ENV.openai_model,
        )),
    );
    let notification_service =
        NotificationService::with_dependencies(notification_repo, Some(relay.clone()));
    let upload_service = UploadService::with_dependencies(
        file_repo,
        user_repo,
        Arc::new(LocalObjectStorage::new(&ENV.upload_dir, &ENV.public_base_url)),
        UploadConfig::from_env(&ENV),
    );

    let sweeper = notification_service.clone();
    actix_web::rt::spawn(async move {
        let mut interval =
            actix_web::rt::time::interval(Duration::from_secs(ENV.notification_sweep_secs));
        loop {
            interval.tick().await;
            if let Err(e) = sweeper.expire_old_notifications(ENV.notification_expiry_days).await {
                log::error!("Notification expiry sweep failed: {}", e);
            }
        }
    });

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&ENV.frontend_url)
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(chat_service.clone()))
            .app_data(web::Data::new(message_service.clone()))
            .app_data(web::Data::new(ai_service.clone()))
            .app_data(web::Data::new(notification_service.clone()))
            .app_data(web::Data::new(upload_service.clone()))
            .app_data(web::Data::new(relay.clone()))
            .service(health_check)
            .route("/ws", web::get().to(relay_handler))
            .service(
                web::scope("/api")
                    .wrap(from_fn(authentication))
                    .configure(modules::user::route::configure)
                    .configure(modules::chat::route::configure)
                    .configure(modules::message::route::configure)
                    .configure(modules::ai::route::configure)
                    .configure(modules::notification::route::configure)
                    .configure(modules::upload::route::configure),
            )
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
