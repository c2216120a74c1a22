use crate::domain::{models::rsvp::RsvpToken, ports::RsvpTokenRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteTokenRepo {
    pool: SqlitePool,
}

impl SqliteTokenRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RsvpTokenRepository for SqliteTokenRepo {
    async fn create(&self, token: &RsvpToken) -> Result<RsvpToken, AppError> {
        sqlx::query_as::<_, RsvpToken>(
            "INSERT INTO rsvp_tokens (id, event_id, token, email, created_at, expires_at, used_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
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
        sqlx::query_as::<_, RsvpToken>("SELECT * FROM rsvp_tokens WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
