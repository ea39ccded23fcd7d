//! Tornado Risk Monitor - Backend
//!
//! Ingests current weather readings for a catalog of cities, scores their
//! tornado risk and keeps the latest record per city for the dashboard.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    routing::get,
    Router,
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

pub mod config;
pub mod database;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use external::ReadingProvider;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub config: Arc<Config>,
    pub provider: Arc<dyn ReadingProvider>,
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        // Static CORS headers; OPTIONS is routed like any other method
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Tornado Risk Monitor API v1.0"
}
