pub mod error;
pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::store::postgres::PgStore;
use crate::store::TrackerStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TrackerStore>,
}

/// Build the full router for the given state. The store behind the state is
/// pluggable; production wires `PgStore`, the integration tests wire the
/// in-memory store.
pub fn app(state: AppState) -> Router {
    let protected_routes = Router::new()
        // Progress routes
        .route("/api/progress", get(routes::progress::get_all))
        .route("/api/progress/update", post(routes::progress::update))
        .route("/api/progress/bulk-update", post(routes::progress::bulk_update))
        // Streak routes
        .route("/api/streak", get(routes::streak::get))
        .route("/api/streak/update", post(routes::streak::update))
        // Settings routes
        .route("/api/settings", get(routes::settings::get))
        .route("/api/settings", put(routes::settings::update))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(routes::account::register))
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Connect to database
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");

    tracing::info!("Connecting to database...");
    let store = PgStore::connect(&database_url).await?;

    tracing::info!("Running migrations...");
    store.run_migrations().await?;

    let state = AppState {
        store: Arc::new(store),
    };

    let app = app(state);

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
