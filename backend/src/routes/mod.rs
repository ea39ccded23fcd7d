//! Route definitions for the Tornado Risk Monitor

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Ingestion trigger: GET and POST both run a cycle. HEAD would
        // otherwise be served by the GET handler.
        .route(
            "/update-weather",
            get(handlers::update_weather)
                .post(handlers::update_weather)
                .head(handlers::method_not_allowed)
                .fallback(handlers::method_not_allowed),
        )
        // Dashboard reads
        .nest("/risk", risk_routes())
        .route("/cities", get(handlers::list_cities))
}

/// Stored risk record routes
fn risk_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_risk_records))
        .route("/:city", get(handlers::get_risk_record))
}
