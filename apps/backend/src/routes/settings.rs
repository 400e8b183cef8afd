//! Settings endpoints

use axum::{extract::State, Extension, Json};

use kanji_core::settings;

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::store::SettingsStore;
use crate::AppState;

/// GET /api/settings
///
/// Always returns a fully resolved settings object; fields the user never
/// set come from the default table, with the username as the display-name
/// fallback.
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<SettingsResponse>>> {
    let stored = state.store.get_settings(auth.user_id).await?;

    let patch = stored.map(|row| row.to_core_patch());
    let resolved = settings::resolve(patch.as_ref(), &auth.username);

    Ok(Json(ApiResponse::ok(SettingsResponse { settings: resolved })))
}

/// PUT /api/settings
///
/// Partial update: only the submitted fields overwrite stored values, so
/// saving one setting never resets another.
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(patch): Json<SettingsPatch>,
) -> Result<Json<ApiResponse<SettingsResponse>>> {
    settings::validate(&patch)?;

    state.store.merge_settings(auth.user_id, &patch).await?;

    // Respond with the resolved state after the merge
    let stored = state.store.get_settings(auth.user_id).await?;
    let merged = stored.map(|row| row.to_core_patch());
    let resolved = settings::resolve(merged.as_ref(), &auth.username);

    Ok(Json(ApiResponse::ok(SettingsResponse { settings: resolved })))
}
