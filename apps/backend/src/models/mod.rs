//! Database models and API types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

// Re-export shared types from kanji-core
pub use kanji_core::types::{
    ItemProgress, Language, ProgressUpdate, QuestionMode, Settings, SettingsPatch, StreakState,
};

// === Database Entity Types ===

/// Registered account, identified by its bearer token
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Progress record stored in PostgreSQL, one row per (user, item)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbProgress {
    pub user_id: Uuid,
    pub item_id: String,
    pub learned: bool,
    pub in_review: bool,
    pub interval_days: i32,
    pub ease_factor: f64,
    pub consecutive_correct: i32,
    pub total_reviews: i32,
    pub correct_reviews: i32,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub next_review_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbProgress {
    /// Create from a normalized kanji-core record
    pub fn from_core_progress(user_id: Uuid, item_id: &str, progress: &ItemProgress) -> Self {
        Self {
            user_id,
            item_id: item_id.to_string(),
            learned: progress.learned,
            in_review: progress.in_review,
            interval_days: progress.interval as i32,
            ease_factor: progress.ease,
            consecutive_correct: progress.consecutive_correct as i32,
            total_reviews: progress.total_reviews as i32,
            correct_reviews: progress.correct_reviews as i32,
            last_reviewed_at: progress.last_reviewed_at,
            next_review_at: progress.next_review_at,
            note: progress.note.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Convert to the kanji-core progress type
    pub fn to_core_progress(&self) -> ItemProgress {
        ItemProgress {
            learned: self.learned,
            in_review: self.in_review,
            interval: self.interval_days as u32,
            ease: self.ease_factor,
            consecutive_correct: self.consecutive_correct as u32,
            total_reviews: self.total_reviews as u32,
            correct_reviews: self.correct_reviews as u32,
            last_reviewed_at: self.last_reviewed_at,
            next_review_at: self.next_review_at,
            note: self.note.clone(),
        }
    }
}

/// Streak state stored in PostgreSQL, one row per user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStreak {
    pub user_id: Uuid,
    pub daily_streak: i32,
    pub last_review_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbStreak {
    /// Convert to the kanji-core streak type
    pub fn to_core_state(&self) -> StreakState {
        StreakState {
            daily_streak: self.daily_streak as u32,
            last_review_date: self.last_review_date,
        }
    }
}

/// Sparse settings overrides stored in PostgreSQL. A NULL column means the
/// user never set that field; reads resolve it against the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSettings {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub max_level: Option<i64>,
    pub level_filter: Option<i64>,
    pub max_interval_days: Option<i64>,
    pub show_readings: Option<bool>,
    pub show_meanings: Option<bool>,
    pub show_stroke_order: Option<bool>,
    pub autoplay_audio: Option<bool>,
    pub question_mode: Option<String>,
    pub language: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbSettings {
    /// Empty overrides for a user who has never saved settings
    pub fn empty_for_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            display_name: None,
            max_level: None,
            level_filter: None,
            max_interval_days: None,
            show_readings: None,
            show_meanings: None,
            show_stroke_order: None,
            autoplay_audio: None,
            question_mode: None,
            language: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Convert to the kanji-core patch type for resolution
    pub fn to_core_patch(&self) -> SettingsPatch {
        SettingsPatch {
            display_name: self.display_name.clone(),
            max_level: self.max_level,
            level_filter: self.level_filter,
            max_interval: self.max_interval_days,
            show_readings: self.show_readings,
            show_meanings: self.show_meanings,
            show_stroke_order: self.show_stroke_order,
            autoplay_audio: self.autoplay_audio,
            question_mode: self.question_mode.clone(),
            language: self.language.clone(),
        }
    }

    /// Overlay a submitted patch; absent fields keep their stored value
    pub fn apply_patch(&mut self, patch: &SettingsPatch) {
        if let Some(v) = &patch.display_name {
            self.display_name = Some(v.clone());
        }
        if let Some(v) = patch.max_level {
            self.max_level = Some(v);
        }
        if let Some(v) = patch.level_filter {
            self.level_filter = Some(v);
        }
        if let Some(v) = patch.max_interval {
            self.max_interval_days = Some(v);
        }
        if let Some(v) = patch.show_readings {
            self.show_readings = Some(v);
        }
        if let Some(v) = patch.show_meanings {
            self.show_meanings = Some(v);
        }
        if let Some(v) = patch.show_stroke_order {
            self.show_stroke_order = Some(v);
        }
        if let Some(v) = patch.autoplay_audio {
            self.autoplay_audio = Some(v);
        }
        if let Some(v) = &patch.question_mode {
            self.question_mode = Some(v.clone());
        }
        if let Some(v) = &patch.language {
            self.language = Some(v.clone());
        }
        self.updated_at = Utc::now();
    }
}

// === API Request/Response Types ===

/// Wrapper adding the `success` flag that every response body carries
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

// Progress types

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressListResponse {
    pub progress: HashMap<String, ItemProgress>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateProgressRequest {
    pub item_id: String,
    #[serde(flatten)]
    pub fields: ProgressUpdate,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkUpdateResponse {
    pub updated: usize,
}

// Streak types

#[derive(Debug, Serialize, Deserialize)]
pub struct StreakResponse {
    pub daily_streak: u32,
    pub last_review_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StreakUpdateResponse {
    pub daily_streak: u32,
}

// Settings types

#[derive(Debug, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub settings: Settings,
}
