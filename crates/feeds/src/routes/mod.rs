//! HTTP route handlers for the feeds service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health              - Health check
//!
//! # Feeds (unauthenticated, consumed by the import tool)
//! GET  /feeds/products      - All published products
//! GET  /feeds/variants      - All variants, deduped by SKU
//! GET  /feeds/collections   - All collections
//! ```
//!
//! Every feed endpoint accepts an optional `?store=` query parameter that
//! selects a suffixed credential set from the environment.

pub mod feeds;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the feed routes router.
pub fn feed_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(feeds::products))
        .route("/variants", get(feeds::variants))
        .route("/collections", get(feeds::collections))
}

/// Create all routes for the feeds service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/feeds", feed_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the upstream API.
async fn health() -> &'static str {
    "ok"
}
