pub mod analytics;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

use axum::{routing::get, Router};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::store::WeddingPartyStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<WeddingPartyStore>,
}

async fn health() -> &'static str {
    "ok"
}

/// Build the full Axum application router over a SQLite-backed store.
///
/// Caller is responsible for running database migrations on `pool` beforehand.
pub fn build_app(pool: SqlitePool) -> Router {
    router(Arc::new(WeddingPartyStore::sqlite(pool)))
}

/// Build the router around an already constructed store.
pub fn router(store: Arc<WeddingPartyStore>) -> Router {
    let state = AppState { store };

    Router::new()
        .route("/health", get(health))
        .merge(routes::weddings::router())
        .merge(routes::members::router())
        .layer(
            TraceLayer::new_for_http()
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
