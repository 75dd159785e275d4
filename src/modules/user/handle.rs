use actix_web::{get, patch, post, web, HttpRequest};

use crate::api::{error, success};
use crate::middlewares::acting_as;
use crate::modules::user::{model, service::UserService};
use crate::utils::{ValidatedJson, ValidatedQuery};

#[post("")]
pub async fn create_user(
    req: HttpRequest,
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::CreateUserModel>,
) -> Result<success::Success<model::CreatedResponse>, error::Error> {
    acting_as(&req, &user_data.0.user_id)?;
    let id = user_service.create_user(user_data.0).await?;
    Ok(success::Success::created(Some(model::CreatedResponse { id }))
        .message("User created successfully"))
}

#[get("/search")]
pub async fn search_users(
    user_service: web::Data<UserService>,
    query: ValidatedQuery<model::SearchUserQuery>,
) -> Result<success::Success<Vec<model::UserResponse>>, error::Error> {
    let users = user_service.search_users(query.0).await?;
    Ok(success::Success::ok(Some(users)).message("Users retrieved successfully"))
}

#[get("/{user_id}")]
pub async fn get_user(
    user_service: web::Data<UserService>,
    user_id: web::Path<String>,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let user = user_service.get_by_key(&user_id).await?;
    Ok(success::Success::ok(Some(user)).message("User retrieved successfully"))
}

#[patch("/{user_id}")]
pub async fn update_user(
    req: HttpRequest,
    user_service: web::Data<UserService>,
    user_id: web::Path<String>,
    user_data: ValidatedJson<model::UpdateUserModel>,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    acting_as(&req, &user_id)?;
    let user = user_service.update_user(&user_id, user_data.0).await?;
    Ok(success::Success::ok(Some(user)).message("User updated successfully"))
}
