use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
pub struct AccessCheckResponse {
    pub can_view_page: bool,
    pub can_submit_rsvp: bool,
    /// Set to "invite_only" when RSVP access was denied on a private event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Serialize)]
pub struct IssuedTokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
