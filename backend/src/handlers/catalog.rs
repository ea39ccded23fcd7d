//! HTTP handlers for the location catalog

use axum::{extract::State, Json};
use shared::Location;

use crate::error::AppResult;
use crate::services::catalog::CatalogService;
use crate::AppState;

/// Locations the next update cycle will process
pub async fn list_cities(State(state): State<AppState>) -> AppResult<Json<Vec<Location>>> {
    let catalog = CatalogService::new(state.db).load_catalog().await?;
    Ok(Json(catalog))
}
