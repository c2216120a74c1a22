use axum::{extract::{State, Path, Query}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, maybe_auth::MaybeAuthUser};
use crate::api::dtos::requests::{IssueTokenRequest, SubmitRsvpRequest};
use crate::api::dtos::responses::{AccessCheckResponse, IssuedTokenResponse};
use crate::domain::models::event::status;
use crate::domain::models::rsvp::RsvpResponse;
use crate::domain::services::access_policy::{RsvpAccess, RsvpGrant};
use crate::error::AppError;
use std::sync::Arc;
use serde::Deserialize;
use tracing::info;

#[derive(Deserialize)]
pub struct AccessQuery {
    pub email: Option<String>,
    pub token: Option<String>,
}

/// Public endpoint. The access decision and the ledger write happen
/// together here: a token is consumed only when the write it authorized
/// actually lands.
pub async fn submit_rsvp(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    Json(payload): Json<SubmitRsvpRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if event.status != status::ACTIVE {
        return Err(AppError::Forbidden("This event is no longer accepting RSVPs".into()));
    }

    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }

    let access = state.access_policy
        .can_submit_rsvp(&event, payload.token.as_deref(), payload.email.as_deref())
        .await?;

    let grant = match access {
        RsvpAccess::Granted(grant) => grant,
        RsvpAccess::InviteOnly => return Err(AppError::InviteOnly),
    };

    // Only a token grant burns the token. An invitee or open grant leaves
    // any supplied token untouched.
    let token_to_burn = match &grant {
        RsvpGrant::Token(token) => Some(token.token.clone()),
        _ => None,
    };

    let response = RsvpResponse::new(
        event.id.clone(),
        payload.name.trim().to_string(),
        payload.email,
        payload.will_attend,
        payload.message,
    );

    let saved = state.rsvp_repo.upsert(&response, token_to_burn.as_deref()).await?;

    info!(
        "RSVP recorded for event {} (attending: {})",
        event.id, saved.will_attend
    );
    Ok((StatusCode::CREATED, Json(saved)))
}

/// Read-only probe for the frontend: never consumes a token.
pub async fn check_access(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(identity): MaybeAuthUser,
    Path(event_id): Path<String>,
    Query(query): Query<AccessQuery>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let identity_email = identity.map(|i| i.email);
    let requester_email = identity_email.as_deref().or(query.email.as_deref());

    let can_view_page = state.access_policy.can_view_page(&event, requester_email).await?;

    let access = state.access_policy
        .can_submit_rsvp(&event, query.token.as_deref(), requester_email)
        .await?;

    let (can_submit_rsvp, reason) = match access {
        RsvpAccess::Granted(_) => (true, None),
        RsvpAccess::InviteOnly => (false, Some("invite_only".to_string())),
    };

    Ok(Json(AccessCheckResponse {
        can_view_page,
        can_submit_rsvp,
        reason,
    }))
}

pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(event_id): Path<String>,
    Json(payload): Json<IssueTokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if !event.is_owner(&user.0.email) {
        return Err(AppError::Forbidden("Only the host can issue invite links".into()));
    }

    let token = state.access_policy.issue_token(&event, payload.email).await?;

    info!("Issued RSVP token for event {}", event.id);
    Ok((StatusCode::CREATED, Json(IssuedTokenResponse {
        token: token.token,
        expires_at: token.expires_at,
    })))
}

pub async fn list_participants(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if !event.is_owner(&user.0.email) {
        return Err(AppError::Forbidden("Only the host can see the participant list".into()));
    }

    let responses = state.rsvp_repo.list_by_event(&event.id).await?;
    Ok(Json(responses))
}
