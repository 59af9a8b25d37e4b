// Trusted-identity extraction for the booking engine.
//
// Credential verification lives in the upstream gateway; by the time a
// request reaches this service it carries the authenticated user id and role
// in headers. The engine trusts those headers and does no token validation
// of its own.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::debug;

use crate::models::Role;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Authenticated identity attached to every lifecycle/feedback call
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub role: Role,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or(AuthError::MissingIdentity)?
            .to_str()
            .map_err(|_| AuthError::InvalidIdentity)?
            .parse::<i32>()
            .map_err(|_| AuthError::InvalidIdentity)?;

        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .ok_or(AuthError::MissingIdentity)?
            .to_str()
            .map_err(|_| AuthError::InvalidIdentity)
            .and_then(|raw| Role::from_str(raw).map_err(|_| AuthError::InvalidIdentity))?;

        debug!("Authenticated request: user_id={}, role={}", user_id, role);
        Ok(AuthenticatedUser { user_id, role })
    }
}

/// Errors produced by the identity extractor
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing identity headers")]
    MissingIdentity,

    #[error("Malformed identity headers")]
    InvalidIdentity,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::MissingIdentity | AuthError::InvalidIdentity => StatusCode::UNAUTHORIZED,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
