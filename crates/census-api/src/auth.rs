//! Admin gate: bearer token verification in front of the participant routes.

use std::time::Duration;

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::metrics;
use crate::security::sanitize_for_log;
use crate::state::AppState;

/// Claims carried by an admin bearer token (HS256).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Username
    pub sub: String,
    /// Whether the holder may use the admin routes
    #[serde(default)]
    pub admin: bool,
    /// Issued at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiration
    pub exp: i64,
}

/// Authorized admin attached to the request by [`require_admin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub username: String,
}

/// Verifies admin tokens against a shared secret.
pub struct AdminGate {
    key: DecodingKey,
    validation: Validation,
}

impl AdminGate {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Decode a token and require the admin claim.
    pub fn authorize(&self, token: &str) -> Result<AdminSession, ApiError> {
        let data = decode::<AdminClaims>(token, &self.key, &self.validation).map_err(|e| {
            metrics::record_admin_rejection("invalid_token");
            ApiError::unauthorized(format!("Token validation failed: {}", e))
        })?;

        if !data.claims.admin {
            metrics::record_admin_rejection("not_admin");
            warn!(user = %sanitize_for_log(&data.claims.sub), "Non-admin token rejected");
            return Err(ApiError::forbidden("Admin access required"));
        }

        Ok(AdminSession {
            username: data.claims.sub,
        })
    }
}

/// Mint a signed token. Used by tests and operator tooling.
pub fn issue_admin_token(
    secret: &str,
    username: &str,
    admin: bool,
    ttl: Duration,
) -> Result<String, ApiError> {
    let now = Utc::now().timestamp();
    let claims = AdminClaims {
        sub: username.to_string(),
        admin,
        iat: Some(now),
        exp: now + ttl.as_secs() as i64,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::internal(format!("Failed to sign token: {}", e)))
}

/// Reject the request unless it carries a valid admin token.
///
/// On success the [`AdminSession`] is stored in the request extensions.
pub async fn require_admin(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        metrics::record_admin_rejection("missing_token");
        return Err(ApiError::unauthorized("Missing bearer token"));
    };

    let session = state.admin_gate.authorize(bearer.token())?;
    debug!(user = %sanitize_for_log(&session.username), "Admin authorized");

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Axum extractor for the session established by [`require_admin`].
#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminSession>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("No admin session"))
    }
}
