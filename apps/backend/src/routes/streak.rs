//! Streak endpoints

use axum::{extract::State, Extension, Json};
use chrono::Utc;

use kanji_core::streak;

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::store::StreakStore;
use crate::AppState;

/// GET /api/streak
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<StreakResponse>>> {
    let response = match state.store.get_streak(auth.user_id).await? {
        Some(row) => StreakResponse {
            daily_streak: row.daily_streak as u32,
            last_review_date: Some(row.last_review_date),
        },
        None => StreakResponse { daily_streak: 0, last_review_date: None },
    };

    Ok(Json(ApiResponse::ok(response)))
}

/// POST /api/streak/update
///
/// Records a review day. Days are UTC calendar dates: repeat calls on the
/// same date leave the streak unchanged, a call the day after the last
/// review extends it, anything else restarts at 1.
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<StreakUpdateResponse>>> {
    let today = Utc::now().date_naive();

    let current = state
        .store
        .get_streak(auth.user_id)
        .await?
        .map(|row| row.to_core_state());
    let decision = streak::advance(current, today);

    let daily_streak = if decision.changed {
        // The store write is conditional on the date, so a same-day race
        // converges on whichever value was committed first.
        let row = state
            .store
            .commit_streak(auth.user_id, decision.streak, today)
            .await?;
        row.daily_streak as u32
    } else {
        decision.streak
    };

    Ok(Json(ApiResponse::ok(StreakUpdateResponse { daily_streak })))
}
