//! Common test utilities and fixtures for integration tests.
//!
//! API tests run against the router wired to the in-memory store, so the
//! whole suite works without external services. PostgreSQL-specific
//! guarantees (transactions, the conditional streak upsert) are covered
//! separately in `store_postgres.rs`.

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use chrono::NaiveDate;
use uuid::Uuid;

use kanjitrack_backend::models::User;
use kanjitrack_backend::store::memory::MemoryStore;
use kanjitrack_backend::store::{StreakStore, UserStore};
use kanjitrack_backend::{app, AppState};

/// Test context holding the store and the router under test.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    app: Router,
}

impl TestContext {
    /// Create a new test context over a fresh in-memory store.
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState { store: store.clone() };
        let app = app(state);

        Self { store, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test user and return it.
    pub async fn create_test_user(&self, username: &str) -> User {
        self.store
            .create_user(username)
            .await
            .expect("Failed to create test user")
    }

    /// Seed streak state directly in the store.
    pub async fn seed_streak(&self, user_id: Uuid, daily_streak: u32, date: NaiveDate) {
        self.store
            .commit_streak(user_id, daily_streak, date)
            .await
            .expect("Failed to seed streak");
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }
}
