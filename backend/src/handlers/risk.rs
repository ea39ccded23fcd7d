//! HTTP handlers for reading stored risk records

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{AppError, AppResult};
use crate::handlers::ingestion::RiskEntry;
use crate::services::risk_store::RiskRecordStore;
use crate::AppState;

/// Current risk of every stored city
pub async fn list_risk_records(State(state): State<AppState>) -> AppResult<Json<Vec<RiskEntry>>> {
    let store = RiskRecordStore::new(state.db);
    let records = store.list_latest().await?;
    Ok(Json(records.iter().map(RiskEntry::from).collect()))
}

/// Current risk of one city
pub async fn get_risk_record(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> AppResult<Json<RiskEntry>> {
    let store = RiskRecordStore::new(state.db);
    let record = store
        .get_latest(&city)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Risk record for {}", city)))?;
    Ok(Json(RiskEntry::from(&record)))
}
