use axum::{extract::State, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::{
    ConfirmEmailRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
};
use crate::domain::models::auth::{purpose, AuthResponse, UserProfile};
use crate::domain::models::user::User;
use std::sync::Arc;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::SameSite;
use time::Duration;
use argon2::{password_hash::{SaltString, PasswordHasher}, PasswordHash, Argon2, PasswordVerifier};
use rand::rngs::OsRng;
use chrono::Utc;
use tracing::{info, warn};

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }
    if payload.password.len() < 8 {
        return Err(AppError::Validation("Password must be at least 8 characters".into()));
    }

    if state.user_repo.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("An account with this email already exists".into()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string();

    let user = User::new(&email, password_hash);
    let created = state.user_repo.create(&user).await?;

    let token = state.auth_service
        .issue_verification_token(&created.id, purpose::CONFIRM_EMAIL, chrono::Duration::hours(24))
        .await?;

    let mut ctx = tera::Context::new();
    ctx.insert("confirm_url", &format!("{}/confirm?token={}", state.config.frontend_url, token));

    match state.templates.render("confirmation.html", &ctx) {
        Ok(html) => {
            if let Err(e) = state.email_service.send(&created.email, "Confirm your account", &html).await {
                warn!("Failed to send confirmation email to {}: {:?}", created.email, e);
            }
        }
        Err(e) => warn!("Failed to render confirmation email: {:?}", e),
    }

    info!("Registered user: {}", created.id);

    Ok((StatusCode::CREATED, Json(serde_json::json!({
        "id": created.id,
        "email": created.email
    }))))
}

pub async fn confirm_email(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ConfirmEmailRequest>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.auth_service
        .consume_verification_token(&payload.token, purpose::CONFIRM_EMAIL)
        .await?;

    state.user_repo.mark_confirmed(&record.user_id, Utc::now()).await?;

    info!("Confirmed email for user: {}", record.user_id);
    Ok(Json(serde_json::json!({"status": "confirmed"})))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_email(&payload.email.to_lowercase()).await?
        .ok_or(AppError::Unauthorized)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal)?;

    Argon2::default().verify_password(payload.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized)?;

    if !user.is_confirmed() {
        return Err(AppError::Forbidden("Email address is not confirmed".into()));
    }

    let (access_jwt, refresh_token, csrf_token) = state.auth_service.login(&user).await?;

    set_cookies(&cookies, &access_jwt, &refresh_token);

    info!("User logged in: {}", user.id);

    Ok(Json(AuthResponse {
        csrf_token,
        user: UserProfile {
            id: user.id,
            email: user.email,
        }
    }))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    let refresh_cookie = cookies.get("refresh_token").ok_or(AppError::Unauthorized)?;
    let raw_token = refresh_cookie.value();

    let token_hash = state.auth_service.hash_token(raw_token);
    let record = state.auth_repo.find_refresh_token(&token_hash).await?
        .ok_or(AppError::Unauthorized)?;

    let user = state.user_repo.find_by_id(&record.user_id).await?
        .ok_or(AppError::Unauthorized)?;

    let (new_access, new_refresh, new_csrf) = state.auth_service.refresh(raw_token, &user).await?;

    set_cookies(&cookies, &new_access, &new_refresh);

    info!("Token refreshed for user: {}", user.id);

    Ok(Json(AuthResponse {
        csrf_token: new_csrf,
        user: UserProfile {
            id: user.id,
            email: user.email,
        }
    }))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    if let Some(cookie) = cookies.get("refresh_token") {
        let _ = state.auth_service.logout(cookie.value()).await;
    }

    cookies.remove(Cookie::build(("access_token", "")).path("/").into());
    cookies.remove(Cookie::build(("refresh_token", "")).path("/").into());

    info!("User logged out");

    Ok(StatusCode::OK)
}

/// Always answers 200 so the endpoint cannot be used to probe which
/// emails have accounts.
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(user) = state.user_repo.find_by_email(&payload.email.to_lowercase()).await? {
        let token = state.auth_service
            .issue_verification_token(&user.id, purpose::RESET_PASSWORD, chrono::Duration::hours(1))
            .await?;

        let mut ctx = tera::Context::new();
        ctx.insert("reset_url", &format!("{}/reset-password?token={}", state.config.frontend_url, token));

        match state.templates.render("password_reset.html", &ctx) {
            Ok(html) => {
                if let Err(e) = state.email_service.send(&user.email, "Reset your password", &html).await {
                    warn!("Failed to send password reset email to {}: {:?}", user.email, e);
                }
            }
            Err(e) => warn!("Failed to render password reset email: {:?}", e),
        }
    }

    Ok(Json(serde_json::json!({"status": "ok"})))
}

pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.new_password.len() < 8 {
        return Err(AppError::Validation("Password must be at least 8 characters".into()));
    }

    let record = state.auth_service
        .consume_verification_token(&payload.token, purpose::RESET_PASSWORD)
        .await?;

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.new_password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string();

    state.user_repo.update_password(&record.user_id, &password_hash).await?;

    // All sessions are invalidated; the user must log in again.
    state.auth_repo.delete_refresh_tokens_for_user(&record.user_id).await?;

    info!("Password reset for user: {}", record.user_id);
    Ok(Json(serde_json::json!({"status": "ok"})))
}

fn set_cookies(cookies: &Cookies, access: &str, refresh: &str) {
    let mut access_c = Cookie::new("access_token", access.to_string());
    access_c.set_http_only(true);
    access_c.set_secure(true);
    access_c.set_same_site(SameSite::Strict);
    access_c.set_path("/");
    access_c.set_max_age(Duration::minutes(15));
    cookies.add(access_c);

    let mut refresh_c = Cookie::new("refresh_token", refresh.to_string());
    refresh_c.set_http_only(true);
    refresh_c.set_secure(true);
    refresh_c.set_same_site(SameSite::Strict);
    refresh_c.set_path("/");
    refresh_c.set_max_age(Duration::days(7));
    cookies.add(refresh_c);
}
