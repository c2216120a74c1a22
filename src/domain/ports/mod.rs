use crate::domain::models::{
    auth::{RefreshTokenRecord, VerificationToken},
    event::Event,
    invitee::Invitee,
    rsvp::{RsvpResponse, RsvpToken},
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn mark_confirmed(&self, id: &str, at: DateTime<Utc>) -> Result<(), AppError>;
    async fn update_password(&self, id: &str, password_hash: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_tokens_for_user(&self, user_id: &str) -> Result<(), AppError>;

    async fn create_verification_token(&self, token: &VerificationToken) -> Result<(), AppError>;
    /// Deletes and returns the token in one statement so a racing second
    /// confirmation cannot consume it twice.
    async fn consume_verification_token(&self, token_hash: &str, purpose: &str) -> Result<Option<VerificationToken>, AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn find_active_by_owner(&self, owner_email: &str) -> Result<Option<Event>, AppError>;
    async fn list_by_owner(&self, owner_email: &str) -> Result<Vec<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait InviteeRepository: Send + Sync {
    async fn create(&self, invitee: &Invitee) -> Result<Invitee, AppError>;
    async fn find_by_event_and_email(&self, event_id: &str, email: &str) -> Result<Option<Invitee>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Invitee>, AppError>;
    async fn delete(&self, event_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait RsvpTokenRepository: Send + Sync {
    async fn create(&self, token: &RsvpToken) -> Result<RsvpToken, AppError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<RsvpToken>, AppError>;
}

#[async_trait]
pub trait RsvpRepository: Send + Sync {
    /// Records a response with update-in-place semantics per
    /// (event, lowercase email). When `token_to_burn` is set, the token is
    /// consumed with an atomic conditional update inside the same
    /// transaction; a racing second consumer gets `Conflict`.
    async fn upsert(&self, response: &RsvpResponse, token_to_burn: Option<&str>) -> Result<RsvpResponse, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<RsvpResponse>, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError>;
}
