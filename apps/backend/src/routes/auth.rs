//! Authentication middleware

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::store::UserStore;
use crate::AppState;

/// Authenticated user info stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
}

/// Auth middleware - resolves the bearer token to a user. All per-user
/// data access downstream is keyed on the injected user id.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    // Skip auth for register endpoint and health check
    let path = request.uri().path();
    if path == "/api/auth/register" || path == "/health" {
        return Ok(next.run(request).await);
    }

    // Extract Bearer token
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization format".to_string()))?;

    // Look up user by token
    let user = state
        .store
        .get_user_by_token(token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid token".to_string()))?;

    // Update last_seen
    state.store.update_last_seen(user.id).await?;

    // Store authenticated user in request extensions
    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        username: user.username,
    });

    Ok(next.run(request).await)
}
