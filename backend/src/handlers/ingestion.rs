//! HTTP handlers for the weather update trigger

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{timestamp_format, MeasurementSnapshot, RiskRecord, RiskScore};

use crate::error::{AppError, ErrorResponse};
use crate::services::catalog::CatalogService;
use crate::services::ingestion::{BatchResult, FailureStage, IngestionOptions, IngestionService};
use crate::services::risk_store::RiskRecordStore;
use crate::AppState;

/// Current risk of one city as shown on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskEntry {
    pub city: String,
    pub score: RiskScore,
    #[serde(with = "timestamp_format")]
    pub timestamp: DateTime<Utc>,
    pub weather: MeasurementSnapshot,
}

impl From<&RiskRecord> for RiskEntry {
    fn from(record: &RiskRecord) -> Self {
        Self {
            city: record.location.name.clone(),
            score: record.score,
            timestamp: record.recorded_at,
            weather: record.snapshot,
        }
    }
}

/// A city whose update failed in this cycle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FailureEntry {
    pub city: String,
    pub stage: FailureStage,
    pub error: String,
}

/// Body returned by a completed update cycle
#[derive(Debug, Serialize)]
pub struct UpdateWeatherResponse {
    pub success: bool,
    pub message: String,
    pub data: Vec<RiskEntry>,
    pub errors: Vec<FailureEntry>,
    #[serde(with = "timestamp_format")]
    pub updated_at: DateTime<Utc>,
}

impl From<&BatchResult> for UpdateWeatherResponse {
    fn from(result: &BatchResult) -> Self {
        let message = if result.failed() == 0 {
            "Weather data updated successfully".to_string()
        } else {
            format!(
                "Weather data updated for {} of {} locations",
                result.succeeded(),
                result.total()
            )
        };

        Self {
            success: true,
            message,
            data: result.successes().map(RiskEntry::from).collect(),
            errors: result
                .failures()
                .map(|f| FailureEntry {
                    city: f.location.name.clone(),
                    stage: f.stage,
                    error: f.message.clone(),
                })
                .collect(),
            updated_at: result.started_at,
        }
    }
}

/// Run one ingestion cycle over the catalog (GET or POST)
///
/// A cycle that cannot start answers `success: false` with HTTP 200; partial
/// failures are listed per city.
pub async fn update_weather(State(state): State<AppState>) -> Response {
    let catalog = match CatalogService::new(state.db.clone()).load_catalog().await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("Ingestion cycle could not start: {:?}", e);
            return Json(ErrorResponse {
                success: false,
                message: format!("Failed to update weather data: {}", e.client_message()),
                error_code: e.error_code(),
            })
            .into_response();
        }
    };

    let service = IngestionService::new(
        Arc::clone(&state.provider),
        Arc::new(RiskRecordStore::new(state.db.clone())),
        IngestionOptions::from(state.config.as_ref()),
    );
    let result = service.run_cycle(&catalog).await;

    Json(UpdateWeatherResponse::from(&result)).into_response()
}

/// Any method other than GET and POST on the trigger
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
