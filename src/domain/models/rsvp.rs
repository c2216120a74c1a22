use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use rand::{distributions::Alphanumeric, Rng};

/// Default lifetime of an invite token. Tokens past this are invalid
/// regardless of whether they were ever consumed.
pub const TOKEN_EXPIRY_DAYS: i64 = 30;

/// A bearer (or email-bound) capability granting one-time RSVP submission
/// rights to a private event. A token with a non-null `used_at` is
/// permanently inert.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct RsvpToken {
    pub id: String,
    pub event_id: String,
    pub token: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl RsvpToken {
    pub fn new(event_id: String, email: Option<String>) -> Self {
        // 32 alphanumeric chars from the thread-local CSPRNG, ~190 bits.
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();

        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            token,
            email: email.map(|e| e.to_lowercase()),
            created_at: now,
            expires_at: now + Duration::days(TOKEN_EXPIRY_DAYS),
            used_at: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct RsvpResponse {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub email: Option<String>,
    pub will_attend: bool,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RsvpResponse {
    pub fn new(
        event_id: String,
        name: String,
        email: Option<String>,
        will_attend: bool,
        message: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            name,
            email: email.map(|e| e.to_lowercase()),
            will_attend,
            message,
            created_at: now,
            updated_at: now,
        }
    }
}
