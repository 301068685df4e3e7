//! API key registry.
//!
//! Stores API keys issued to users together with each key's token budget,
//! and exposes lookup and creation over a small JSON API.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: SQLite with sqlx (async queries)
//! - **Format**: JSON requests/responses

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{db::DbPool, services::api_key_service::TokenPolicy};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub token_policy: TokenPolicy,
}

/// Build the HTTP router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/v1/api-keys",
            post(handlers::api_keys::create_api_key),
        )
        .route(
            "/api/v1/api-keys/{key}",
            get(handlers::api_keys::get_api_key),
        )
        .route(
            "/api/v1/users/{user_id}/api-keys",
            get(handlers::api_keys::list_user_api_keys),
        )
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
