use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::state::AppState;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::domain::services::access_policy::AccessPolicy;
use crate::domain::services::auth_service::AuthService;
use crate::infra::repositories::{
    postgres_auth_repo::PostgresAuthRepo, postgres_event_repo::PostgresEventRepo,
    postgres_invitee_repo::PostgresInviteeRepo, postgres_rsvp_repo::PostgresRsvpRepo,
    postgres_token_repo::PostgresTokenRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_auth_repo::SqliteAuthRepo, sqlite_event_repo::SqliteEventRepo,
    sqlite_invitee_repo::SqliteInviteeRepo, sqlite_rsvp_repo::SqliteRsvpRepo,
    sqlite_token_repo::SqliteTokenRepo, sqlite_user_repo::SqliteUserRepo,
};

pub fn load_templates() -> Tera {
    let mut tera = Tera::default();
    tera.add_raw_template("confirmation.html", include_str!("../templates/confirmation.html"))
        .expect("Failed to load confirmation template");
    tera.add_raw_template("password_reset.html", include_str!("../templates/password_reset.html"))
        .expect("Failed to load password reset template");
    tera.add_raw_template("invitation.html", include_str!("../templates/invitation.html"))
        .expect("Failed to load invitation template");
    tera
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));

    let templates = Arc::new(load_templates());

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let auth_repo = Arc::new(PostgresAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));

        let invitee_repo = Arc::new(PostgresInviteeRepo::new(pool.clone()));
        let token_repo = Arc::new(PostgresTokenRepo::new(pool.clone()));
        let access_policy = Arc::new(AccessPolicy::new(invitee_repo.clone(), token_repo.clone()));

        AppState {
            config: config.clone(),
            user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
            event_repo: Arc::new(PostgresEventRepo::new(pool.clone())),
            rsvp_repo: Arc::new(PostgresRsvpRepo::new(pool.clone())),
            invitee_repo,
            token_repo,
            auth_repo,
            access_policy,
            auth_service,
            email_service,
            templates,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));

        let invitee_repo = Arc::new(SqliteInviteeRepo::new(pool.clone()));
        let token_repo = Arc::new(SqliteTokenRepo::new(pool.clone()));
        let access_policy = Arc::new(AccessPolicy::new(invitee_repo.clone(), token_repo.clone()));

        AppState {
            config: config.clone(),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
            rsvp_repo: Arc::new(SqliteRsvpRepo::new(pool.clone())),
            invitee_repo,
            token_repo,
            auth_repo,
            access_policy,
            auth_service,
            email_service,
            templates,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
