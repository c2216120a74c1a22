use crate::domain::{models::invitee::Invitee, ports::InviteeRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresInviteeRepo {
    pool: PgPool,
}

impl PostgresInviteeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InviteeRepository for PostgresInviteeRepo {
    async fn create(&self, invitee: &Invitee) -> Result<Invitee, AppError> {
        sqlx::query_as::<_, Invitee>(
            "INSERT INTO invitees (id, event_id, email, rsvp_status, invited_at) VALUES ($1, $2, $3, $4, $5) RETURNING *"
        )
            .bind(&invitee.id)
            .bind(&invitee.event_id)
            .bind(&invitee.email)
            .bind(&invitee.rsvp_status)
            .bind(invitee.invited_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_event_and_email(&self, event_id: &str, email: &str) -> Result<Option<Invitee>, AppError> {
        sqlx::query_as::<_, Invitee>("SELECT * FROM invitees WHERE event_id = $1 AND email = $2")
            .bind(event_id)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Invitee>, AppError> {
        sqlx::query_as::<_, Invitee>("SELECT * FROM invitees WHERE event_id = $1 ORDER BY invited_at ASC")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, event_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM invitees WHERE id = $1 AND event_id = $2")
            .bind(id)
            .bind(event_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Invitee not found".into()));
        }
        Ok(())
    }
}
