//! Storage abstraction for the tracking engine.
//!
//! Handlers are wired against these traits instead of a concrete pool so the
//! engine's contract is explicit: every mutation is an atomic keyed upsert
//! (or one transaction for the reconciliation batch), and concurrent writers
//! for the same key serialize to a single final state. `PgStore` is the
//! production implementation; `MemoryStore` backs the integration tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use kanji_core::types::{ItemProgress, SettingsPatch};

use crate::models::{DbProgress, DbSettings, DbStreak, User};

/// Store-layer failure. Details are logged server-side and never surfaced to
/// API clients.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("write conflict: {0}")]
    Conflict(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Account lookup for registration and the auth middleware.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, username: &str) -> Result<User>;

    async fn get_user_by_token(&self, token: &str) -> Result<Option<User>>;

    async fn update_last_seen(&self, user_id: Uuid) -> Result<()>;
}

/// Canonical per-(user, item) learning records.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Every record for the user, ordered by item id.
    async fn get_all_progress(&self, user_id: Uuid) -> Result<Vec<DbProgress>>;

    /// Write or fully overwrite the record for one key. The write replaces
    /// the whole record; callers normalize before calling in.
    async fn upsert_progress(&self, user_id: Uuid, item_id: &str, progress: &ItemProgress)
        -> Result<()>;

    /// Apply a whole batch as one atomic unit, in submission order, and
    /// return the number of entries applied. Either every entry lands or
    /// none do.
    async fn upsert_progress_batch(
        &self,
        user_id: Uuid,
        entries: &[(String, ItemProgress)],
    ) -> Result<usize>;
}

/// Daily streak state, one record per user.
#[async_trait]
pub trait StreakStore: Send + Sync {
    async fn get_streak(&self, user_id: Uuid) -> Result<Option<DbStreak>>;

    /// Conditional upsert: the write applies only when the stored
    /// `last_review_date` differs from `date`, and the call returns the row
    /// as it stands afterwards. Two same-day writers therefore converge on
    /// whichever value landed first.
    async fn commit_streak(&self, user_id: Uuid, daily_streak: u32, date: NaiveDate)
        -> Result<DbStreak>;
}

/// Sparse per-user settings overrides.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_settings(&self, user_id: Uuid) -> Result<Option<DbSettings>>;

    /// Field-by-field merge: only fields present in the patch overwrite
    /// stored values. One atomic statement, never read-modify-write.
    async fn merge_settings(&self, user_id: Uuid, patch: &SettingsPatch) -> Result<()>;
}

/// The full contract the backend is wired against.
pub trait TrackerStore: UserStore + ProgressStore + StreakStore + SettingsStore {}

impl<T: UserStore + ProgressStore + StreakStore + SettingsStore> TrackerStore for T {}
