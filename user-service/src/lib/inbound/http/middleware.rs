use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::user::models::RoleId;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type to store the caller's identity in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
    pub role_id: RoleId,
}

/// Middleware that validates bearer tokens and adds the caller to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req).map_err(IntoResponse::into_response)?;

    let identity = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "JWT validation failed");
        token_error(&e).into_response()
    })?;

    let user_id = UserId::from_string(&identity.sub).map_err(|e| {
        tracing::error!(error = %e, "Token subject is not a user id");
        ApiError::unauthorized("Invalid token format", "malformed_token").into_response()
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id,
        email: identity.email,
        role_id: RoleId(identity.role),
    });

    Ok(next.run(req).await)
}

fn token_error(err: &auth::JwtError) -> ApiError {
    match err {
        auth::JwtError::ExpiredToken => ApiError::unauthorized("Token has expired", "expired_token"),
        auth::JwtError::InvalidSignature => {
            ApiError::unauthorized("Invalid token signature", "invalid_signature")
        }
        auth::JwtError::MalformedToken(_) | auth::JwtError::IssuanceFailed(_) => {
            ApiError::unauthorized("Invalid or expired token", "malformed_token")
        }
    }
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header", "missing_token"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header", "missing_token"))?;

    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>",
            "missing_token",
        )
    })
}
