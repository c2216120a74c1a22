use crate::domain::{models::event::Event, ports::EventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            "INSERT INTO events (id, owner_email, title, date, time, location, details, punishment, access_mode, page_visibility, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&event.id).bind(&event.owner_email).bind(&event.title).bind(event.date)
            .bind(&event.time).bind(&event.location).bind(&event.details).bind(&event.punishment)
            .bind(&event.access_mode).bind(&event.page_visibility).bind(&event.status)
            .bind(event.created_at).bind(event.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_active_by_owner(&self, owner_email: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE owner_email = ? AND status = 'ACTIVE'")
            .bind(owner_email).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_owner(&self, owner_email: &str) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE owner_email = ? ORDER BY created_at DESC")
            .bind(owner_email).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            "UPDATE events SET title=?, date=?, time=?, location=?, details=?, punishment=?, access_mode=?, page_visibility=?, status=?, updated_at=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&event.title).bind(event.date).bind(&event.time).bind(&event.location)
            .bind(&event.details).bind(&event.punishment).bind(&event.access_mode)
            .bind(&event.page_visibility).bind(&event.status).bind(event.updated_at)
            .bind(&event.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".into()));
        }
        Ok(())
    }
}
