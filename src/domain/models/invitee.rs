use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub mod rsvp_status {
    pub const PENDING: &str = "PENDING";
    pub const ATTENDING: &str = "ATTENDING";
    pub const DECLINED: &str = "DECLINED";
}

/// An email explicitly granted standing access to a private event.
/// `rsvp_status` is a denormalized cache of the invitee's latest response.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Invitee {
    pub id: String,
    pub event_id: String,
    pub email: String,
    pub rsvp_status: String, // PENDING | ATTENDING | DECLINED
    pub invited_at: DateTime<Utc>,
}

impl Invitee {
    pub fn new(event_id: String, email: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            email: email.to_lowercase(),
            rsvp_status: rsvp_status::PENDING.to_string(),
            invited_at: Utc::now(),
        }
    }
}
