//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::services::risk_store::RiskRecordStore;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    /// Cities with a stored risk record; absent when the database is down
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracked_cities: Option<i64>,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let tracked_cities = RiskRecordStore::new(state.db).count().await.ok();
    let (status, database) = match tracked_cities {
        Some(_) => ("healthy", "connected"),
        None => ("degraded", "disconnected"),
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database,
        tracked_cities,
    })
}
