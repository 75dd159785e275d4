use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::configs::CacheStore;
use crate::constants::USER_CACHE_TTL_SECS;
use crate::modules::user::model::{
    CreateUserModel, InsertUser, SearchUserQuery, UpdateUser, UpdateUserModel, UserResponse,
};
use crate::modules::user::repository::UserRepository;

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository + Send + Sync>,
    cache: Arc<dyn CacheStore + Send + Sync>,
}

fn cache_key(user_key: &str) -> String {
    format!("user:{}", user_key)
}

impl UserService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository + Send + Sync>,
        cache: Arc<dyn CacheStore + Send + Sync>,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, cache }
    }

    pub async fn get_by_key(&self, user_key: &str) -> Result<UserResponse, error::SystemError> {
        let key = cache_key(user_key);
        if let Some(bytes) = self.cache.get(&key).await? {
            info!("User {} found in cache", user_key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let entity = self
            .repo
            .find_by_key(user_key)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        let user = UserResponse::from(entity);
        self.cache.set(&key, serde_json::to_vec(&user)?, USER_CACHE_TTL_SECS).await?;
        info!("User {} cached", user_key);
        Ok(user)
    }

    pub async fn create_user(&self, user: CreateUserModel) -> Result<Uuid, error::SystemError> {
        let new_user = InsertUser {
            user_key: user.user_id,
            name: user.name,
            role: user.role,
            profile: user.profile_details.unwrap_or_default(),
            created_at: chrono::Utc::now(),
        };

        let id = self.repo.create(&new_user).await?;
        info!("User {} created with id {}", new_user.user_key, id);
        Ok(id)
    }

    pub async fn update_user(
        &self,
        user_key: &str,
        user: UpdateUserModel,
    ) -> Result<UserResponse, error::SystemError> {
        if user.name.is_none()
            && user.email.is_none()
            && user.picture.is_none()
            && user.height.is_none()
            && user.weight.is_none()
        {
            return Err(error::SystemError::bad_request("No fields to update"));
        }

        let existing = self
            .repo
            .find_by_key(user_key)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        let update_user = UpdateUser {
            name: user.name,
            email: user.email,
            picture: user.picture,
            height: user.height,
            weight: user.weight,
            updated_at: chrono::Utc::now(),
        };

        let updated = self.repo.update(&existing.id, &update_user).await?;

        self.cache.delete(&cache_key(user_key)).await?;
        Ok(UserResponse::from(updated))
    }

    pub async fn search_users(
        &self,
        query: SearchUserQuery,
    ) -> Result<Vec<UserResponse>, error::SystemError> {
        let users = self.repo.search_users(query.q.trim(), query.limit.unwrap_or(20)).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }
}
