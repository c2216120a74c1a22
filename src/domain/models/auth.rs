use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,

    #[serde(rename = "https://showup.app/claims/email")]
    pub email: String,

    #[serde(rename = "https://showup.app/claims/csrf")]
    pub csrf_token: String,
}

/// The requester identity decoded from a valid access token.
#[derive(Debug, Clone)]
pub struct AuthIdentity {
    pub id: String,
    pub email: String,
}

#[derive(Debug, FromRow)]
pub struct RefreshTokenRecord {
    pub token_hash: String,
    pub user_id: String,
    pub family_id: Uuid,
    pub generation_id: i32,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

pub mod purpose {
    pub const CONFIRM_EMAIL: &str = "CONFIRM_EMAIL";
    pub const RESET_PASSWORD: &str = "RESET_PASSWORD";
}

/// Single-use account token (email confirmation, password reset). Only the
/// SHA-256 hash of the raw token is stored.
#[derive(Debug, FromRow)]
pub struct VerificationToken {
    pub token_hash: String,
    pub user_id: String,
    pub purpose: String, // CONFIRM_EMAIL | RESET_PASSWORD
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub csrf_token: String,
    pub user: UserProfile,
}

#[derive(Serialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
}
