//! Database repository for operator accounts.

use crate::db::{
    errors::Result,
    models::users::{UserCreateDBRequest, UserDBResponse},
};
use sqlx::PgPool;
use tracing::instrument;

/// Operator accounts are only written by startup seeding and read by authentication.
#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    /// Create the operator, or replace the password hash if the username already exists
    async fn upsert(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse>;

    async fn get_by_username(&self, username: &str) -> Result<Option<UserDBResponse>>;
}

/// PostgreSQL-backed operator repository
#[derive(Debug, Clone)]
pub struct Users {
    db: PgPool,
}

impl Users {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl UserRepository for Users {
    #[instrument(skip(self, request), fields(username = %request.username), err)]
    async fn upsert(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse> {
        let user = sqlx::query_as::<_, UserDBResponse>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            ON CONFLICT (username) DO UPDATE SET
                password_hash = EXCLUDED.password_hash,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(&request.username)
        .bind(&request.password_hash)
        .fetch_one(&self.db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self), err)]
    async fn get_by_username(&self, username: &str) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, UserDBResponse>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }
}
