//! Progress endpoints

use std::collections::HashMap;

use axum::{extract::State, Extension, Json};

use kanji_core::progress;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::store::ProgressStore;
use crate::AppState;

/// GET /api/progress
pub async fn get_all(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<ProgressListResponse>>> {
    let rows = state.store.get_all_progress(auth.user_id).await?;

    let progress: HashMap<String, ItemProgress> = rows
        .into_iter()
        .map(|row| (row.item_id.clone(), row.to_core_progress()))
        .collect();

    Ok(Json(ApiResponse::ok(ProgressListResponse { progress })))
}

/// POST /api/progress/update
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateProgressRequest>,
) -> Result<Json<serde_json::Value>> {
    progress::validate_item_id(&request.item_id)?;
    let record = progress::normalize(&request.fields)?;

    state
        .store
        .upsert_progress(auth.user_id, &request.item_id, &record)
        .await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/progress/bulk-update
///
/// Body: `{ "items": [[item_id, fields], ...] }`. The whole batch is
/// validated before any write and then applied as one transaction, so a bad
/// entry rejects everything. Duplicate item ids are allowed; the last
/// occurrence wins.
pub async fn bulk_update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<ApiResponse<BulkUpdateResponse>>> {
    let items = body
        .get("items")
        .ok_or_else(|| ApiError::Validation("missing field: items".to_string()))?
        .as_array()
        .ok_or_else(|| ApiError::Validation("items must be an array".to_string()))?;

    let mut entries: Vec<(String, ItemProgress)> = Vec::with_capacity(items.len());
    for (index, entry) in items.iter().enumerate() {
        let (item_id, fields): (String, ProgressUpdate) = serde_json::from_value(entry.clone())
            .map_err(|e| ApiError::Validation(format!("items[{index}]: {e}")))?;

        progress::validate_item_id(&item_id)
            .map_err(|e| ApiError::Validation(format!("items[{index}]: {e}")))?;
        let record = progress::normalize(&fields)
            .map_err(|e| ApiError::Validation(format!("items[{index}]: {e}")))?;

        entries.push((item_id, record));
    }

    let updated = state
        .store
        .upsert_progress_batch(auth.user_id, &entries)
        .await?;

    tracing::debug!(user_id = %auth.user_id, updated, "applied bulk progress update");

    Ok(Json(ApiResponse::ok(BulkUpdateResponse { updated })))
}
