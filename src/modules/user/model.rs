use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::user::schema::{UserEntity, UserRole};
use crate::utils::double_option;

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct ProfileDetailsModel {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(url(message = "Picture must be a valid URL"))]
    pub picture: Option<String>,
    #[validate(range(min = 0.0, message = "Height cannot be negative"))]
    pub height: Option<f64>,
    #[validate(range(min = 0.0, message = "Weight cannot be negative"))]
    pub weight: Option<f64>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserModel {
    #[validate(length(min = 1, message = "User id cannot be empty"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[serde(default = "default_role")]
    pub role: UserRole,
    #[validate(nested)]
    pub profile_details: Option<ProfileDetailsModel>,
}

fn default_role() -> UserRole {
    UserRole::User
}

#[derive(Default, Deserialize, Validate)]
pub struct UpdateUserModel {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub picture: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(range(min = 0.0, message = "Height cannot be negative"))]
    pub height: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(range(min = 0.0, message = "Weight cannot be negative"))]
    pub weight: Option<Option<f64>>,
}

#[derive(Deserialize, Validate)]
pub struct SearchUserQuery {
    #[validate(length(min = 1, message = "Search query cannot be empty"))]
    pub q: String,
    #[validate(range(min = 1, max = 50, message = "Limit must be between 1 and 50"))]
    pub limit: Option<i64>,
}

pub struct InsertUser {
    pub user_key: String,
    pub name: String,
    pub role: UserRole,
    pub profile: ProfileDetailsModel,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub picture: Option<Option<String>>,
    pub height: Option<Option<f64>>,
    pub weight: Option<Option<f64>>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub role: UserRole,
    pub profile_details: ProfileDetailsModel,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserEntity> for UserResponse {
    fn from(entity: UserEntity) -> Self {
        UserResponse {
            id: entity.id,
            user_id: entity.user_key,
            name: entity.name,
            role: entity.role,
            profile_details: ProfileDetailsModel {
                email: entity.email,
                picture: entity.picture,
                height: entity.height,
                weight: entity.weight,
            },
            created_at: entity.created_at,
        }
    }
}
