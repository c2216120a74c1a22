use axum::{extract::{State, Path, Query}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, maybe_auth::MaybeAuthUser};
use crate::api::dtos::requests::{CreateEventRequest, UpdateEventRequest, UpdateEventStatusRequest};
use crate::domain::models::event::{access_mode, page_visibility, status, Event, NewEventParams};
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

#[derive(Deserialize)]
pub struct ViewerQuery {
    pub email: Option<String>,
}

fn validate_mode(value: &str) -> Result<(), AppError> {
    match value {
        access_mode::PUBLIC | access_mode::PRIVATE => Ok(()),
        other => Err(AppError::Validation(format!("Invalid mode: {}", other))),
    }
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }

    let access = payload.access_mode.unwrap_or_else(|| access_mode::PUBLIC.to_string());
    let visibility = payload.page_visibility.unwrap_or_else(|| page_visibility::PUBLIC.to_string());
    validate_mode(&access)?;
    validate_mode(&visibility)?;

    // The partial unique index is the real guard; this pre-check exists to
    // name the blocking event in the error.
    if let Some(existing) = state.event_repo.find_active_by_owner(&user.0.email).await? {
        return Err(AppError::Conflict(format!(
            "An active event already exists: {}", existing.id
        )));
    }

    let event = Event::new(NewEventParams {
        owner_email: user.0.email.to_lowercase(),
        title: payload.title,
        date: payload.date,
        time: payload.time,
        location: payload.location,
        details: payload.details.unwrap_or_default(),
        punishment: payload.punishment.unwrap_or_default(),
        access_mode: access,
        page_visibility: visibility,
    });

    let created = state.event_repo.create(&event).await?;

    info!("Created event {} for {}", created.id, created.owner_email);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_repo.list_by_owner(&user.0.email).await?;
    Ok(Json(events))
}

/// Public endpoint. Guests may identify themselves with `?email=`; a
/// PRIVATE page stays hidden from everyone but the owner and invitees.
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(identity): MaybeAuthUser,
    Path(event_id): Path<String>,
    Query(query): Query<ViewerQuery>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let identity_email = identity.map(|i| i.email);
    let requester_email = identity_email.as_deref().or(query.email.as_deref());

    if !state.access_policy.can_view_page(&event, requester_email).await? {
        return Err(AppError::Forbidden("This event page is private".into()));
    }

    Ok(Json(event))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(event_id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if !event.is_owner(&user.0.email) {
        return Err(AppError::Forbidden("Only the host can edit this event".into()));
    }

    if let Some(title) = payload.title {
        if title.trim().is_empty() {
            return Err(AppError::Validation("Title cannot be empty".into()));
        }
        event.title = title;
    }
    if let Some(date) = payload.date {
        event.date = date;
    }
    if let Some(time) = payload.time {
        event.time = time;
    }
    if let Some(location) = payload.location {
        event.location = location;
    }
    if let Some(details) = payload.details {
        event.details = details;
    }
    if let Some(punishment) = payload.punishment {
        event.punishment = punishment;
    }
    if let Some(access) = payload.access_mode {
        validate_mode(&access)?;
        event.access_mode = access;
    }
    if let Some(visibility) = payload.page_visibility {
        validate_mode(&visibility)?;
        event.page_visibility = visibility;
    }

    event.updated_at = Utc::now();
    let updated = state.event_repo.update(&event).await?;

    info!("Updated event {}", event_id);
    Ok(Json(updated))
}

/// Terminal transition: ACTIVE -> CANCELLED | COMPLETED. The row stays in
/// place so attendance history survives.
pub async fn update_event_status(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(event_id): Path<String>,
    Json(payload): Json<UpdateEventStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if !event.is_owner(&user.0.email) {
        return Err(AppError::Forbidden("Only the host can change event status".into()));
    }

    match payload.status.as_str() {
        status::CANCELLED | status::COMPLETED => {}
        other => return Err(AppError::Validation(format!("Invalid status: {}", other))),
    }

    if event.status != status::ACTIVE {
        return Err(AppError::Conflict(format!(
            "Event is already {}", event.status
        )));
    }

    event.status = payload.status;
    event.updated_at = Utc::now();
    let updated = state.event_repo.update(&event).await?;

    info!("Event {} moved to {}", event_id, updated.status);
    Ok(Json(updated))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if !event.is_owner(&user.0.email) {
        return Err(AppError::Forbidden("Only the host can delete this event".into()));
    }

    state.event_repo.delete(&event_id).await?;

    info!("Deleted event {}", event_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
