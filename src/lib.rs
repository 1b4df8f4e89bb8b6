//! GitHub repository preview images and a rate-limited, cached star counter.

pub mod config;
pub mod error;
pub mod github;
pub mod handlers;
pub mod metrics;
pub mod origin;
pub mod preview;
pub mod rate_limit;
pub mod star_cache;
pub mod state;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::state::AppState;

// creating the router with routes
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/api/repo", get(handlers::repo_handler))
        .route(
            "/api/stars",
            get(handlers::stars_handler)
                .head(handlers::method_not_allowed)
                .fallback(handlers::method_not_allowed),
        )
        .with_state(state)
}
