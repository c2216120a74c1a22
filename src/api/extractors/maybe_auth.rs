use axum::{
    extract::{FromRequestParts, FromRef},
    http::{request::Parts, StatusCode},
};
use crate::state::AppState;
use crate::domain::models::auth::{AuthIdentity, Claims};
use crate::domain::services::auth_service::JWT_AUDIENCE;
use std::sync::Arc;
use tower_cookies::Cookies;
use jsonwebtoken::{decode, DecodingKey, Validation, Algorithm};
use tracing::debug;

/// Like `AuthUser`, but treats any missing or invalid credential as a
/// guest instead of rejecting. Used on pages guests may see.
pub struct MaybeAuthUser(pub Option<AuthIdentity>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let cookies = match parts.extensions.get::<Cookies>() {
            Some(cookies) => cookies,
            None => return Ok(MaybeAuthUser(None)),
        };

        let access_token = match cookies.get("access_token") {
            Some(cookie) => cookie.value().to_string(),
            None => return Ok(MaybeAuthUser(None)),
        };

        let decoding_key = match DecodingKey::from_ed_pem(app_state.config.jwt_public_key.as_bytes()) {
            Ok(key) => key,
            Err(_) => {
                debug!("MaybeAuth: Invalid Public Key config");
                return Ok(MaybeAuthUser(None));
            }
        };

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[JWT_AUDIENCE]);

        let token_data = match decode::<Claims>(&access_token, &decoding_key, &validation) {
            Ok(data) => data,
            // Invalid token (expired, bad signature) -> Treat as guest
            Err(_) => return Ok(MaybeAuthUser(None)),
        };

        Ok(MaybeAuthUser(Some(AuthIdentity {
            id: token_data.claims.sub,
            email: token_data.claims.email,
        })))
    }
}
