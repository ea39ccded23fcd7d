//! Weather API client for fetching current conditions
//!
//! Integrates with the OpenWeatherMap current weather endpoint and converts
//! its units to the ones the risk scoring works in.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::{Location, MeasurementSnapshot};

use super::ReadingProvider;
use crate::error::{AppError, AppResult, ProviderError};

/// OpenWeatherMap-backed reading provider
#[derive(Clone)]
pub struct OpenWeatherMapProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    main: OWMMain,
    visibility: Option<f64>,
    wind: OWMWind,
    clouds: OWMClouds,
    rain: Option<OWMPrecipitation>,
    snow: Option<OWMPrecipitation>,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
    pressure: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OWMWind {
    speed: f64,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OWMClouds {
    all: f64,
}

#[derive(Debug, Deserialize)]
struct OWMPrecipitation {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

/// Visibility reported when the API omits it (its maximum, 10 km)
const DEFAULT_VISIBILITY_METERS: f64 = 10_000.0;

impl OpenWeatherMapProvider {
    /// Create a provider against `base_url` (the configured API endpoint)
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Convert OpenWeatherMap current response to our format
    fn convert_current_response(data: OWMCurrentResponse) -> MeasurementSnapshot {
        let precipitation_mm = [&data.rain, &data.snow]
            .into_iter()
            .flatten()
            .filter_map(|p| p.one_hour)
            .sum();

        MeasurementSnapshot {
            temperature_celsius: data.main.temp,
            humidity_percent: data.main.humidity,
            pressure_hpa: data.main.pressure,
            // m/s -> km/h
            wind_speed_kmh: data.wind.speed * 3.6,
            wind_direction_deg: normalize_direction(data.wind.deg.unwrap_or(0.0)),
            precipitation_mm,
            cloud_cover_percent: data.clouds.all,
            visibility_km: data.visibility.unwrap_or(DEFAULT_VISIBILITY_METERS) / 1000.0,
        }
    }
}

/// Fold any bearing into 0-359 degrees
fn normalize_direction(degrees: f64) -> u16 {
    (degrees.round().rem_euclid(360.0) as u16) % 360
}

#[async_trait]
impl ReadingProvider for OpenWeatherMapProvider {
    async fn fetch(&self, location: &Location) -> Result<MeasurementSnapshot, ProviderError> {
        let url = format!("{}/weather", self.base_url);
        tracing::debug!(city = %location.name, "Requesting current weather");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", location.latitude.to_string()),
                ("lon", location.longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let data: OWMCurrentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        Ok(Self::convert_current_response(data))
    }
}
