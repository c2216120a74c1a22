use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ConfirmEmailRequest {
    pub token: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub details: Option<String>,
    pub punishment: Option<String>,
    pub access_mode: Option<String>,
    pub page_visibility: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub details: Option<String>,
    pub punishment: Option<String>,
    pub access_mode: Option<String>,
    pub page_visibility: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateEventStatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct CreateInviteeRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct IssueTokenRequest {
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct SubmitRsvpRequest {
    pub name: String,
    pub email: Option<String>,
    pub will_attend: bool,
    pub message: Option<String>,
    pub token: Option<String>,
}
