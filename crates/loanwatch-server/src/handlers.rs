//! Request handlers.
//!
//! Query endpoints take [`FilterCriteria`] as the JSON body and return the
//! matching aggregate. Engine errors map to status codes as follows:
//!
//! | Error | Status |
//! |---|---|
//! | `InvalidCriteria` | 400 Bad Request |
//! | `EmptyResult` | 422 Unprocessable Entity |
//! | anything else | 500 Internal Server Error |

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use loanwatch_portfolio::{Catalog, FilterCriteria, FilterEngine, PortfolioError, PortfolioResult};

/// Application state.
pub struct AppState {
    /// The filter engine over the loaded snapshot table
    pub engine: Arc<FilterEngine>,
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check handler.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// Status code for an engine error.
pub fn status_for(err: &PortfolioError) -> StatusCode {
    match err {
        PortfolioError::InvalidCriteria { .. } => StatusCode::BAD_REQUEST,
        PortfolioError::EmptyResult { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        PortfolioError::Load(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond<T: Serialize>(result: PortfolioResult<T>) -> (StatusCode, Json<Value>) {
    match result {
        Ok(value) => match serde_json::to_value(value) {
            Ok(body) => (StatusCode::OK, Json(body)),
            Err(e) => {
                warn!(error = %e, "failed to serialize response");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": e.to_string() })),
                )
            }
        },
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                warn!(error = %e, "query failed");
            } else {
                debug!(error = %e, status = status.as_u16(), "query rejected");
            }
            (status, Json(json!({ "error": e.to_string() })))
        }
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// Catalog response: selection widget contents plus the initial selection.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    /// Product types, default reasons, date bounds and row count
    #[serde(flatten)]
    pub catalog: Catalog,
    /// Criteria the dashboard starts with
    pub default_selection: FilterCriteria,
}

/// Get the catalog of the loaded table.
pub async fn get_catalog(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let catalog = state.engine.store().catalog();
    let default_selection = catalog.default_selection();

    respond(Ok(CatalogResponse {
        catalog,
        default_selection,
    }))
}

// =============================================================================
// STATISTICS
// =============================================================================

/// All three statistic cards at once.
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Json(criteria): Json<FilterCriteria>,
) -> impl IntoResponse {
    respond(state.engine.summary(&criteria))
}

/// Number of matching rows.
pub async fn get_count(
    State(state): State<Arc<AppState>>,
    Json(criteria): Json<FilterCriteria>,
) -> impl IntoResponse {
    respond(
        state
            .engine
            .count_stat(&criteria)
            .map(|count| json!({ "count": count })),
    )
}

/// Number of matching rows in default.
pub async fn get_defaults_count(
    State(state): State<Arc<AppState>>,
    Json(criteria): Json<FilterCriteria>,
) -> impl IntoResponse {
    respond(
        state
            .engine
            .defaults_count(&criteria)
            .map(|defaults_count| json!({ "defaults_count": defaults_count })),
    )
}

/// Forward default rate of the matching rows.
pub async fn get_event_rate(
    State(state): State<Arc<AppState>>,
    Json(criteria): Json<FilterCriteria>,
) -> impl IntoResponse {
    respond(
        state
            .engine
            .event_rate_stat(&criteria)
            .map(|event_rate| json!({ "event_rate": event_rate })),
    )
}

// =============================================================================
// SERIES
// =============================================================================

/// Criteria plus the product breakdown switch.
#[derive(Debug, Deserialize)]
pub struct SeriesRequest {
    /// Filter criteria
    #[serde(flatten)]
    pub criteria: FilterCriteria,

    /// Break each period down by product type
    #[serde(default)]
    pub decompose: bool,
}

/// Row counts per reporting period.
pub async fn get_counts_series(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SeriesRequest>,
) -> impl IntoResponse {
    respond(
        state
            .engine
            .counts_by_period(&request.criteria, request.decompose),
    )
}

/// Row counts per rating.
pub async fn get_rating_histogram(
    State(state): State<Arc<AppState>>,
    Json(criteria): Json<FilterCriteria>,
) -> impl IntoResponse {
    respond(state.engine.rating_histogram(&criteria))
}

/// Forward default rate per reporting period.
pub async fn get_default_rate_series(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SeriesRequest>,
) -> impl IntoResponse {
    respond(
        state
            .engine
            .default_rate_by_period(&request.criteria, request.decompose),
    )
}
