use crate::domain::models::invitee::rsvp_status;
use crate::domain::{models::rsvp::RsvpResponse, ports::RsvpRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteRsvpRepo {
    pool: SqlitePool,
}

impl SqliteRsvpRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RsvpRepository for SqliteRsvpRepo {
    async fn upsert(&self, response: &RsvpResponse, token_to_burn: Option<&str>) -> Result<RsvpResponse, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Conditional update so two concurrent submissions cannot both
        // consume the same token; the loser rolls back its response.
        if let Some(token) = token_to_burn {
            let result = sqlx::query(
                "UPDATE rsvp_tokens SET used_at = ? WHERE token = ? AND used_at IS NULL AND expires_at > ?"
            )
                .bind(Utc::now()).bind(token).bind(Utc::now())
                .execute(&mut *tx).await.map_err(AppError::Database)?;
            if result.rows_affected() == 0 {
                return Err(AppError::Conflict("Token invalid or already used".to_string()));
            }
        }

        // Race-safe upsert against the partial unique index; resubmission
        // with the same email updates in place instead of duplicating.
        let stored = sqlx::query_as::<_, RsvpResponse>(
            "INSERT INTO rsvp_responses (id, event_id, name, email, will_attend, message, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (event_id, email) WHERE email IS NOT NULL
             DO UPDATE SET name = excluded.name, will_attend = excluded.will_attend,
                           message = excluded.message, updated_at = excluded.updated_at
             RETURNING *"
        )
            .bind(&response.id).bind(&response.event_id).bind(&response.name).bind(&response.email)
            .bind(response.will_attend).bind(&response.message)
            .bind(response.created_at).bind(response.updated_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        // Denormalized invitee cache; a miss just means no standing invite.
        if let Some(email) = &stored.email {
            let status = if stored.will_attend { rsvp_status::ATTENDING } else { rsvp_status::DECLINED };
            sqlx::query("UPDATE invitees SET rsvp_status = ? WHERE event_id = ? AND email = ?")
                .bind(status).bind(&stored.event_id).bind(email)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(stored)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<RsvpResponse>, AppError> {
        sqlx::query_as::<_, RsvpResponse>(
            "SELECT * FROM rsvp_responses WHERE event_id = ? ORDER BY created_at ASC"
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
