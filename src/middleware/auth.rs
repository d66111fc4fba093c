use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::Claims;
use crate::error::ApiError;

const MISSING_TOKEN: &str = "No Token, please login!";
const MALFORMED_SCHEME: &str = "Invalid token format. Please Use Bearer.";
const INVALID_TOKEN: &str = "Invalid or expired token";

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user: String,
    pub user_id: Uuid,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user: claims.user,
            user_id: claims.user_id,
        }
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(request.headers()).map_err(|msg| {
        tracing::debug!(reason = msg, "Rejected request without usable bearer token");
        ApiError::unauthorized(msg)
    })?;

    let claims = state.jwt.verify(token).map_err(|e| {
        tracing::warn!(error = %e, "Rejected bearer token");
        ApiError::unauthorized(INVALID_TOKEN)
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

/// The header must be exactly `Bearer <token>`
fn extract_bearer(headers: &HeaderMap) -> Result<&str, &'static str> {
    let value = headers.get(header::AUTHORIZATION).ok_or(MISSING_TOKEN)?;
    let value = value.to_str().map_err(|_| MALFORMED_SCHEME)?;

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        ["Bearer", token] if !token.is_empty() => Ok(token),
        _ => Err(MALFORMED_SCHEME),
    }
}
