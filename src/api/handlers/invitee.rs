use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::CreateInviteeRequest;
use crate::domain::models::event::Event;
use crate::domain::models::invitee::Invitee;
use crate::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};

async fn owned_event(state: &AppState, event_id: &str, owner_email: &str) -> Result<Event, AppError> {
    let event = state.event_repo.find_by_id(event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if !event.is_owner(owner_email) {
        return Err(AppError::Forbidden("Only the host can manage invitees".into()));
    }
    Ok(event)
}

pub async fn create_invitee(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(event_id): Path<String>,
    Json(payload): Json<CreateInviteeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = owned_event(&state, &event_id, &user.0.email).await?;

    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }

    if state.invitee_repo.find_by_event_and_email(&event.id, &email).await?.is_some() {
        return Err(AppError::Conflict("This email is already invited".into()));
    }

    let invitee = Invitee::new(event.id.clone(), &email);
    let created = state.invitee_repo.create(&invitee).await?;

    // Invitation email is best effort; the invitation itself stands even
    // if the relay is down.
    send_invitation(&state, &event, &created.email).await;

    info!("Invited {} to event {}", created.email, event.id);
    Ok((StatusCode::CREATED, Json(created)))
}

async fn send_invitation(state: &AppState, event: &Event, email: &str) {
    let token = match state.access_policy.issue_token(event, Some(email.to_string())).await {
        Ok(token) => token,
        Err(e) => {
            warn!("Failed to issue invite token for {}: {:?}", email, e);
            return;
        }
    };

    let mut ctx = tera::Context::new();
    ctx.insert("event_title", &event.title);
    ctx.insert("host_email", &event.owner_email);
    ctx.insert("punishment", &event.punishment);
    ctx.insert("invite_url", &format!(
        "{}/events/{}?token={}", state.config.frontend_url, event.id, token.token
    ));

    let html = match state.templates.render("invitation.html", &ctx) {
        Ok(html) => html,
        Err(e) => {
            warn!("Failed to render invitation email: {:?}", e);
            return;
        }
    };

    let subject = format!("You are invited: {}", event.title);
    if let Err(e) = state.email_service.send(email, &subject, &html).await {
        warn!("Failed to send invitation email to {}: {:?}", email, e);
    }
}

pub async fn list_invitees(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = owned_event(&state, &event_id, &user.0.email).await?;

    let invitees = state.invitee_repo.list_by_event(&event.id).await?;
    Ok(Json(invitees))
}

pub async fn delete_invitee(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path((event_id, invitee_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let event = owned_event(&state, &event_id, &user.0.email).await?;

    state.invitee_repo.delete(&event.id, &invitee_id).await?;

    info!("Removed invitee {} from event {}", invitee_id, event.id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
