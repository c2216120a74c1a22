use showup_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::factory::load_templates,
    infra::repositories::{
        sqlite_auth_repo::SqliteAuthRepo,
        sqlite_event_repo::SqliteEventRepo,
        sqlite_invitee_repo::SqliteInviteeRepo,
        sqlite_rsvp_repo::SqliteRsvpRepo,
        sqlite_token_repo::SqliteTokenRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
    domain::services::access_policy::AccessPolicy,
    domain::services::auth_service::AuthService,
    domain::ports::EmailService,
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    Router,
};
use std::str::FromStr;
use async_trait::async_trait;
use tower::ServiceExt;
use serde_json::{json, Value};

#[derive(Clone, Debug)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Records every outbound email so tests can pull confirmation and
/// invitation tokens out of the rendered bodies.
pub struct MockEmailService {
    pub sent: Mutex<Vec<SentEmail>>,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self { sent: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(SentEmail {
            to: recipient.to_string(),
            subject: subject.to_string(),
            body: html_body.to_string(),
        });
        Ok(())
    }
}

pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub mailbox: Arc<MockEmailService>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let templates = Arc::new(load_templates());

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
        };

        let mailbox = Arc::new(MockEmailService::new());

        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));

        let invitee_repo = Arc::new(SqliteInviteeRepo::new(pool.clone()));
        let token_repo = Arc::new(SqliteTokenRepo::new(pool.clone()));
        let access_policy = Arc::new(AccessPolicy::new(invitee_repo.clone(), token_repo.clone()));

        let state = Arc::new(AppState {
            config: config.clone(),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
            rsvp_repo: Arc::new(SqliteRsvpRepo::new(pool.clone())),
            invitee_repo,
            token_repo,
            auth_repo,
            access_policy,
            auth_service,
            email_service: mailbox.clone(),
            templates,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            mailbox,
        }
    }

    /// Registers, confirms via the token in the captured email, and logs in.
    pub async fn register_and_login(&self, email: &str, password: &str) -> AuthHeaders {
        let register_res = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"email": email, "password": password}).to_string()))
                .unwrap()
        ).await.unwrap();

        if !register_res.status().is_success() {
            panic!("Register failed in test helper: status {}", register_res.status());
        }

        let token = self.last_email_token(email)
            .expect("No confirmation email captured for user");

        let confirm_res = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/confirm")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"token": token}).to_string()))
                .unwrap()
        ).await.unwrap();

        if !confirm_res.status().is_success() {
            panic!("Confirm failed in test helper: status {}", confirm_res.status());
        }

        self.login(email, password).await
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthHeaders {
        let payload = json!({
            "email": email,
            "password": password
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let cookies: Vec<String> = response.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .collect();

        let access_token_cookie = cookies.iter()
            .find(|c| c.contains("access_token="))
            .expect("No access_token cookie returned");

        let start = access_token_cookie.find("access_token=").unwrap() + 13;
        let end = access_token_cookie[start..].find(';').unwrap_or(access_token_cookie.len() - start);
        let access_token = access_token_cookie[start..start+end].to_string();

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body_json: Value = serde_json::from_slice(&body_bytes).unwrap();
        let csrf_token = body_json["csrf_token"].as_str().expect("No csrf_token in body").to_string();

        AuthHeaders {
            access_token,
            csrf_token
        }
    }

    /// Extracts the `token=` query value from the most recent email sent
    /// to `recipient`.
    pub fn last_email_token(&self, recipient: &str) -> Option<String> {
        let sent = self.mailbox.sent.lock().unwrap();
        let email = sent.iter().rev().find(|e| e.to.eq_ignore_ascii_case(recipient))?;

        let start = email.body.find("token=")? + 6;
        let rest = &email.body[start..];
        let end = rest.find('"').unwrap_or(rest.len());
        Some(rest[..end].to_string())
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
