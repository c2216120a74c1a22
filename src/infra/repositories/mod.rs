pub mod sqlite_user_repo;
pub mod sqlite_auth_repo;
pub mod sqlite_event_repo;
pub mod sqlite_invitee_repo;
pub mod sqlite_token_repo;
pub mod sqlite_rsvp_repo;

pub mod postgres_user_repo;
pub mod postgres_auth_repo;
pub mod postgres_event_repo;
pub mod postgres_invitee_repo;
pub mod postgres_token_repo;
pub mod postgres_rsvp_repo;
