use crate::domain::{models::rsvp::RsvpToken, ports::RsvpTokenRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresTokenRepo {
    pool: PgPool,
}

impl PostgresTokenRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RsvpTokenRepository for PostgresTokenRepo {
    async fn create(&self, token: &RsvpToken) -> Result<RsvpToken, AppError> {
        sqlx::query_as::<_, RsvpToken>(
            "INSERT INTO rsvp_tokens (id, event_id, token, email, created_at, expires_at, used_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *"
        )
            .bind(&token.id)
            .bind(&token.event_id)
            .bind(&token.token)
            .bind(&token.email)
            .bind(token.created_at)
            .bind(token.expires_at)
            .bind(token.used_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RsvpToken>, AppError> {
        sqlx::query_as::<_, RsvpToken>("SELECT * FROM rsvp_tokens WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
