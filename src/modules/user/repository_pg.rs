use uuid::Uuid;

use crate::{
    api::error,
    modules::user::{
        model::{InsertUser, UpdateUser},
        repository::UserRepository,
        schema::UserEntity,
    },
};

#[derive(Clone)]
pub struct UserRepositoryPg {
    pool: sqlx::PgPool,
}

impl UserRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserRepository for UserRepositoryPg {
    async fn find_by_key(&self, user_key: &str) -> Result<Option<UserEntity>, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE user_key = $1")
            .bind(user_key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserEntity>, error::SystemError> {
        let users = sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn create(&self, user: &InsertUser) -> Result<Uuid, error::SystemError> {
        let id = Uuid::now_v7();
        sqlx::query(
            r#"
            INSERT INTO users
                (id, user_key, name, role, email, picture, height, weight, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            "#,
        )
        .bind(id)
        .bind(&user.user_key)
        .bind(&user.name)
        .bind(&user.role)
        .bind(&user.profile.email)
        .bind(&user.profile.picture)
        .bind(user.profile.height)
        .bind(user.profile.weight)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update(&self, id: &Uuid, user: &UpdateUser) -> Result<UserEntity, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>(
            r#"
        UPDATE users
        SET
            name       = COALESCE($2, name),
            email      = CASE WHEN $3::boolean THEN $4 ELSE email END,
            picture    = CASE WHEN $5::boolean THEN $6 ELSE picture END,
            height     = CASE WHEN $7::boolean THEN $8 ELSE height END,
            weight     = CASE WHEN $9::boolean THEN $10 ELSE weight END,
            updated_at = $11
        WHERE id = $1
        RETURNING *
        "#,
        )
        .bind(id)
        .bind(&user.name) // $2: Option<String>
        .bind(user.email.is_some()) // $3: was email provided?
        .bind(user.email.as_ref().and_then(|v| v.as_ref())) // $4
        .bind(user.picture.is_some()) // $5: was picture provided?
        .bind(user.picture.as_ref().and_then(|v| v.as_ref())) // $6
        .bind(user.height.is_some()) // $7: was height provided?
        .bind(user.height.flatten()) // $8
        .bind(user.weight.is_some()) // $9: was weight provided?
        .bind(user.weight.flatten()) // $10
        .bind(user.updated_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        Ok(user)
    }

    async fn search_users(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<UserEntity>, error::SystemError> {
        let search_pattern = format!("%{}%", query.replace('%', "\\%").replace('_', "\\_"));
        let users = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT * FROM users
            WHERE lower(name) LIKE lower($1)
               OR lower(user_key) LIKE lower($1)
            ORDER BY name
            LIMIT $2
            "#,
        )
        .bind(&search_pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}
