//! External reading providers

pub mod simulated;
pub mod weather;

use std::sync::Arc;

use async_trait::async_trait;
use shared::{Location, MeasurementSnapshot};

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::{AppError, AppResult, ProviderError};

pub use simulated::SimulatedProvider;
pub use weather::OpenWeatherMapProvider;

/// Source of current readings for a location
#[async_trait]
pub trait ReadingProvider: Send + Sync {
    /// Fetch a fresh snapshot for `location`
    async fn fetch(&self, location: &Location) -> Result<MeasurementSnapshot, ProviderError>;
}

/// Build the provider selected in configuration
pub fn build_provider(config: &ProviderConfig) -> AppResult<Arc<dyn ReadingProvider>> {
    match config.kind {
        ProviderKind::Simulated => {
            let provider = match config.seed {
                Some(seed) => SimulatedProvider::with_seed(seed),
                None => SimulatedProvider::new(),
            };
            Ok(Arc::new(provider))
        }
        ProviderKind::OpenWeatherMap => {
            if config.api_key.is_empty() {
                return Err(AppError::Configuration(
                    "Weather API key not configured".to_string(),
                ));
            }
            let provider = OpenWeatherMapProvider::new(
                config.api_key.clone(),
                config.api_endpoint.clone(),
                config.timeout(),
            )?;
            Ok(Arc::new(provider))
        }
    }
}
