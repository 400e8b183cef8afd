//! Account registration endpoint

use axum::{extract::State, Json};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::store::UserStore;
use crate::AppState;

/// POST /api/auth/register
///
/// Issues a user id and bearer token. Identity management proper lives
/// elsewhere; this is the minimal issuance surface the tracker needs.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<RegisterResponse>>> {
    let username = request.username.trim();
    if username.is_empty() {
        return Err(ApiError::Validation("username must not be empty".to_string()));
    }

    let user = state.store.create_user(username).await?;

    tracing::info!(user_id = %user.id, "registered user");

    Ok(Json(ApiResponse::ok(RegisterResponse {
        user_id: user.id,
        username: user.username,
        token: user.token,
    })))
}
