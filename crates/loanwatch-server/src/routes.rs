//! Route definitions.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use loanwatch_portfolio::FilterEngine;

use crate::handlers::{self, AppState};

/// Create the API router.
///
/// # Arguments
/// * `engine` - The filter engine over the loaded snapshot table
pub fn create_router(engine: Arc<FilterEngine>) -> Router {
    let state = Arc::new(AppState { engine });

    Router::new()
        // Health
        .route("/health", get(handlers::health))
        .route("/api/v1/health", get(handlers::health))
        // Catalog
        .route("/api/v1/catalog", get(handlers::get_catalog))
        // Statistic cards
        .route("/api/v1/stats", post(handlers::get_summary))
        .route("/api/v1/stats/count", post(handlers::get_count))
        .route("/api/v1/stats/defaults", post(handlers::get_defaults_count))
        .route("/api/v1/stats/event-rate", post(handlers::get_event_rate))
        // Charts
        .route("/api/v1/series/counts", post(handlers::get_counts_series))
        .route("/api/v1/series/ratings", post(handlers::get_rating_histogram))
        .route("/api/v1/series/default-rate", post(handlers::get_default_rate_series))
        // State
        .with_state(state)
}
