//! In-memory store implementation.
//!
//! Backs the integration tests so the API suite runs without PostgreSQL.
//! A single mutex guards all tables and is held for the whole of each call,
//! which gives every operation the same atomicity the SQL statements give
//! `PgStore`. The lock is never held across an await point.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use kanji_core::types::{ItemProgress, SettingsPatch};

use crate::models::{DbProgress, DbSettings, DbStreak, User};
use crate::store::{ProgressStore, Result, SettingsStore, StreakStore, UserStore};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    progress: HashMap<(Uuid, String), DbProgress>,
    streaks: HashMap<Uuid, DbStreak>,
    settings: HashMap<Uuid, DbSettings>,
}

/// Mutex-guarded in-memory store
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store mutex poisoned")
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, username: &str) -> Result<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            token: Uuid::new_v4().to_string(),
            created_at: now,
            last_seen_at: now,
        };
        self.lock().users.push(user.clone());
        Ok(user)
    }

    async fn get_user_by_token(&self, token: &str) -> Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.token == token).cloned())
    }

    async fn update_last_seen(&self, user_id: Uuid) -> Result<()> {
        let mut tables = self.lock();
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
            user.last_seen_at = Utc::now();
        }
        Ok(())
    }
}

fn insert_progress(
    tables: &mut Tables,
    user_id: Uuid,
    item_id: &str,
    progress: &ItemProgress,
) {
    let key = (user_id, item_id.to_string());
    let mut row = DbProgress::from_core_progress(user_id, item_id, progress);
    if let Some(existing) = tables.progress.get(&key) {
        row.created_at = existing.created_at;
    }
    tables.progress.insert(key, row);
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn get_all_progress(&self, user_id: Uuid) -> Result<Vec<DbProgress>> {
        let tables = self.lock();
        let mut rows: Vec<DbProgress> = tables
            .progress
            .values()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.item_id.cmp(&b.item_id));
        Ok(rows)
    }

    async fn upsert_progress(
        &self,
        user_id: Uuid,
        item_id: &str,
        progress: &ItemProgress,
    ) -> Result<()> {
        let mut tables = self.lock();
        insert_progress(&mut tables, user_id, item_id, progress);
        Ok(())
    }

    async fn upsert_progress_batch(
        &self,
        user_id: Uuid,
        entries: &[(String, ItemProgress)],
    ) -> Result<usize> {
        // One lock for the whole batch stands in for the SQL transaction.
        let mut tables = self.lock();
        for (item_id, progress) in entries {
            insert_progress(&mut tables, user_id, item_id, progress);
        }
        Ok(entries.len())
    }
}

#[async_trait]
impl StreakStore for MemoryStore {
    async fn get_streak(&self, user_id: Uuid) -> Result<Option<DbStreak>> {
        Ok(self.lock().streaks.get(&user_id).cloned())
    }

    async fn commit_streak(
        &self,
        user_id: Uuid,
        daily_streak: u32,
        date: NaiveDate,
    ) -> Result<DbStreak> {
        let mut tables = self.lock();
        let now = Utc::now();
        match tables.streaks.get_mut(&user_id) {
            // Date already stamped: the write is suppressed and the caller
            // gets the value that landed first.
            Some(row) if row.last_review_date == date => Ok(row.clone()),
            Some(row) => {
                row.daily_streak = daily_streak as i32;
                row.last_review_date = date;
                row.updated_at = now;
                Ok(row.clone())
            }
            None => {
                let row = DbStreak {
                    user_id,
                    daily_streak: daily_streak as i32,
                    last_review_date: date,
                    created_at: now,
                    updated_at: now,
                };
                tables.streaks.insert(user_id, row.clone());
                Ok(row)
            }
        }
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get_settings(&self, user_id: Uuid) -> Result<Option<DbSettings>> {
        Ok(self.lock().settings.get(&user_id).cloned())
    }

    async fn merge_settings(&self, user_id: Uuid, patch: &SettingsPatch) -> Result<()> {
        let mut tables = self.lock();
        tables
            .settings
            .entry(user_id)
            .or_insert_with(|| DbSettings::empty_for_user(user_id))
            .apply_patch(patch);
        Ok(())
    }
}
