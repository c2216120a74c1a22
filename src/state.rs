use std::sync::Arc;
use crate::domain::ports::{
    AuthRepository, EmailService, EventRepository, InviteeRepository,
    RsvpRepository, RsvpTokenRepository, UserRepository,
};
use crate::domain::services::access_policy::AccessPolicy;
use crate::domain::services::auth_service::AuthService;
use crate::config::Config;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub invitee_repo: Arc<dyn InviteeRepository>,
    pub token_repo: Arc<dyn RsvpTokenRepository>,
    pub rsvp_repo: Arc<dyn RsvpRepository>,
    pub access_policy: Arc<AccessPolicy>,
    pub auth_service: Arc<AuthService>,
    pub email_service: Arc<dyn EmailService>,
    pub templates: Arc<Tera>,
}
