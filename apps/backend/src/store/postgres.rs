//! PostgreSQL store implementation

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use kanji_core::types::{ItemProgress, SettingsPatch};

use crate::models::{DbProgress, DbSettings, DbStreak, User};
use crate::store::{
    ProgressStore, Result, SettingsStore, StoreError, StreakStore, UserStore,
};

/// Store backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.into()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// === User Store ===

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, username: &str) -> Result<User> {
        let token = Uuid::new_v4().to_string();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, token)
            VALUES ($1, $2)
            RETURNING id, username, token, created_at, last_seen_at
            "#,
        )
        .bind(username)
        .bind(&token)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user_by_token(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, token, created_at, last_seen_at
            FROM users
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_last_seen(&self, user_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_seen_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// === Progress Store ===

const UPSERT_PROGRESS_SQL: &str = r#"
    INSERT INTO progress (user_id, item_id, learned, in_review, interval_days, ease_factor,
                          consecutive_correct, total_reviews, correct_reviews,
                          last_reviewed_at, next_review_at, note)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
    ON CONFLICT (user_id, item_id) DO UPDATE SET
        learned = EXCLUDED.learned,
        in_review = EXCLUDED.in_review,
        interval_days = EXCLUDED.interval_days,
        ease_factor = EXCLUDED.ease_factor,
        consecutive_correct = EXCLUDED.consecutive_correct,
        total_reviews = EXCLUDED.total_reviews,
        correct_reviews = EXCLUDED.correct_reviews,
        last_reviewed_at = EXCLUDED.last_reviewed_at,
        next_review_at = EXCLUDED.next_review_at,
        note = EXCLUDED.note,
        updated_at = NOW()
"#;

#[async_trait]
impl ProgressStore for PgStore {
    async fn get_all_progress(&self, user_id: Uuid) -> Result<Vec<DbProgress>> {
        let rows = sqlx::query_as::<_, DbProgress>(
            r#"
            SELECT user_id, item_id, learned, in_review, interval_days, ease_factor,
                   consecutive_correct, total_reviews, correct_reviews,
                   last_reviewed_at, next_review_at, note, created_at, updated_at
            FROM progress
            WHERE user_id = $1
            ORDER BY item_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn upsert_progress(
        &self,
        user_id: Uuid,
        item_id: &str,
        progress: &ItemProgress,
    ) -> Result<()> {
        sqlx::query(UPSERT_PROGRESS_SQL)
            .bind(user_id)
            .bind(item_id)
            .bind(progress.learned)
            .bind(progress.in_review)
            .bind(progress.interval as i32)
            .bind(progress.ease)
            .bind(progress.consecutive_correct as i32)
            .bind(progress.total_reviews as i32)
            .bind(progress.correct_reviews as i32)
            .bind(progress.last_reviewed_at)
            .bind(progress.next_review_at)
            .bind(progress.note.as_deref())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn upsert_progress_batch(
        &self,
        user_id: Uuid,
        entries: &[(String, ItemProgress)],
    ) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        for (item_id, progress) in entries {
            sqlx::query(UPSERT_PROGRESS_SQL)
                .bind(user_id)
                .bind(item_id)
                .bind(progress.learned)
                .bind(progress.in_review)
                .bind(progress.interval as i32)
                .bind(progress.ease)
                .bind(progress.consecutive_correct as i32)
                .bind(progress.total_reviews as i32)
                .bind(progress.correct_reviews as i32)
                .bind(progress.last_reviewed_at)
                .bind(progress.next_review_at)
                .bind(progress.note.as_deref())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(entries.len())
    }
}

// === Streak Store ===

#[async_trait]
impl StreakStore for PgStore {
    async fn get_streak(&self, user_id: Uuid) -> Result<Option<DbStreak>> {
        let streak = sqlx::query_as::<_, DbStreak>(
            r#"
            SELECT user_id, daily_streak, last_review_date, created_at, updated_at
            FROM streaks
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(streak)
    }

    async fn commit_streak(
        &self,
        user_id: Uuid,
        daily_streak: u32,
        date: NaiveDate,
    ) -> Result<DbStreak> {
        // The WHERE guard makes the update a no-op when this date is already
        // stamped, so two same-day writers cannot double-increment.
        let committed = sqlx::query_as::<_, DbStreak>(
            r#"
            INSERT INTO streaks (user_id, daily_streak, last_review_date)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE SET
                daily_streak = EXCLUDED.daily_streak,
                last_review_date = EXCLUDED.last_review_date,
                updated_at = NOW()
            WHERE streaks.last_review_date IS DISTINCT FROM EXCLUDED.last_review_date
            RETURNING user_id, daily_streak, last_review_date, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(daily_streak as i32)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        match committed {
            Some(row) => Ok(row),
            // Guard suppressed the write: another request already stamped
            // this date. Read back whatever it committed.
            None => self
                .get_streak(user_id)
                .await?
                .ok_or_else(|| StoreError::Conflict(format!("streak row missing for user {user_id}"))),
        }
    }
}

// === Settings Store ===

#[async_trait]
impl SettingsStore for PgStore {
    async fn get_settings(&self, user_id: Uuid) -> Result<Option<DbSettings>> {
        let settings = sqlx::query_as::<_, DbSettings>(
            r#"
            SELECT user_id, display_name, max_level, level_filter, max_interval_days,
                   show_readings, show_meanings, show_stroke_order, autoplay_audio,
                   question_mode, language, created_at, updated_at
            FROM settings
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings)
    }

    async fn merge_settings(&self, user_id: Uuid, patch: &SettingsPatch) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (user_id, display_name, max_level, level_filter,
                                  max_interval_days, show_readings, show_meanings,
                                  show_stroke_order, autoplay_audio, question_mode, language)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (user_id) DO UPDATE SET
                display_name = COALESCE(EXCLUDED.display_name, settings.display_name),
                max_level = COALESCE(EXCLUDED.max_level, settings.max_level),
                level_filter = COALESCE(EXCLUDED.level_filter, settings.level_filter),
                max_interval_days = COALESCE(EXCLUDED.max_interval_days, settings.max_interval_days),
                show_readings = COALESCE(EXCLUDED.show_readings, settings.show_readings),
                show_meanings = COALESCE(EXCLUDED.show_meanings, settings.show_meanings),
                show_stroke_order = COALESCE(EXCLUDED.show_stroke_order, settings.show_stroke_order),
                autoplay_audio = COALESCE(EXCLUDED.autoplay_audio, settings.autoplay_audio),
                question_mode = COALESCE(EXCLUDED.question_mode, settings.question_mode),
                language = COALESCE(EXCLUDED.language, settings.language),
                updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(patch.display_name.as_deref())
        .bind(patch.max_level)
        .bind(patch.level_filter)
        .bind(patch.max_interval)
        .bind(patch.show_readings)
        .bind(patch.show_meanings)
        .bind(patch.show_stroke_order)
        .bind(patch.autoplay_audio)
        .bind(patch.question_mode.as_deref())
        .bind(patch.language.as_deref())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
