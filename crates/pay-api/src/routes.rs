//! # Routes
//!
//! Axum router configuration for the payment API.

use crate::access_log::access_log;
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Create the main application router
///
/// Routes (all under `/rest`):
///   - POST /v1/charge - Charge an invoice
///   - GET  /ready     - Readiness check
///   - GET  /alive     - Liveness check
///
/// Other methods on these paths get 405, unknown paths 404. A response not
/// produced within the write timeout becomes a 408; the body read deadline is
/// applied by the charge handler itself.
pub fn create_router(state: AppState) -> Router {
    let write_timeout = state.config.write_timeout;

    let rest_routes = Router::new()
        // Charge
        .route("/v1/charge", post(handlers::charge))
        // Health checks
        .route("/ready", get(handlers::health))
        .route("/alive", get(handlers::health));

    Router::new()
        .nest("/rest", rest_routes)
        // Middleware
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            write_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        // Outermost, so timeouts and 404/405 are logged too
        .layer(middleware::from_fn(access_log))
        // State
        .with_state(state)
}
