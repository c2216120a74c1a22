use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

pub mod access_mode {
    pub const PUBLIC: &str = "PUBLIC";
    pub const PRIVATE: &str = "PRIVATE";
}

pub mod page_visibility {
    pub const PUBLIC: &str = "PUBLIC";
    pub const PRIVATE: &str = "PRIVATE";
}

pub mod status {
    pub const ACTIVE: &str = "ACTIVE";
    pub const CANCELLED: &str = "CANCELLED";
    pub const COMPLETED: &str = "COMPLETED";
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub owner_email: String,
    pub title: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub details: String,
    pub punishment: String,
    pub access_mode: String,     // PUBLIC | PRIVATE
    pub page_visibility: String, // PUBLIC | PRIVATE
    pub status: String,          // ACTIVE | CANCELLED | COMPLETED
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewEventParams {
    pub owner_email: String,
    pub title: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub details: String,
    pub punishment: String,
    pub access_mode: String,
    pub page_visibility: String,
}

impl Event {
    pub fn new(params: NewEventParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            owner_email: params.owner_email,
            title: params.title,
            date: params.date,
            time: params.time,
            location: params.location,
            details: params.details,
            punishment: params.punishment,
            access_mode: params.access_mode,
            page_visibility: params.page_visibility,
            status: status::ACTIVE.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owner(&self, email: &str) -> bool {
        self.owner_email.eq_ignore_ascii_case(email)
    }
}
