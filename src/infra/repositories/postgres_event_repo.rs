use crate::domain::{models::event::Event, ports::EventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            "INSERT INTO events (id, owner_email, title, date, time, location, details, punishment, access_mode, page_visibility, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING *"
        )
            .bind(&event.id).bind(&event.owner_email).bind(&event.title).bind(event.date)
            .bind(&event.time).bind(&event.location).bind(&event.details).bind(&event.punishment)
            .bind(&event.access_mode).bind(&event.page_visibility).bind(&event.status)
            .bind(event.created_at).bind(event.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_active_by_owner(&self, owner_email: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE owner_email = $1 AND status = 'ACTIVE'")
            .bind(owner_email).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_owner(&self, owner_email: &str) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE owner_email = $1 ORDER BY created_at DESC")
            .bind(owner_email).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            "UPDATE events SET title=$1, date=$2, time=$3, location=$4, details=$5, punishment=$6, access_mode=$7, page_visibility=$8, status=$9, updated_at=$10
             WHERE id=$11
             RETURNING *"
        )
            .bind(&event.title).bind(event.date).bind(&event.time).bind(&event.location)
            .bind(&event.details).bind(&event.punishment).bind(&event.access_mode)
            .bind(&event.page_visibility).bind(&event.status).bind(event.updated_at)
            .bind(&event.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".into()));
        }
        Ok(())
    }
}
