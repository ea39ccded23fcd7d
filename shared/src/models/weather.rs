//! Weather data models

use serde::{Deserialize, Serialize};

/// One reading of current conditions at a location
///
/// Field names on the wire follow the dashboard contract (`temperature`,
/// `wind_speed`, `clouds`, ...).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MeasurementSnapshot {
    /// Air temperature in °C
    #[serde(rename = "temperature")]
    pub temperature_celsius: f64,
    /// Relative humidity in %
    #[serde(rename = "humidity")]
    pub humidity_percent: f64,
    /// Barometric pressure in hPa
    #[serde(rename = "pressure")]
    pub pressure_hpa: f64,
    /// Wind speed in km/h
    #[serde(rename = "wind_speed")]
    pub wind_speed_kmh: f64,
    /// Wind direction in degrees, 0-359
    #[serde(rename = "wind_direction")]
    pub wind_direction_deg: u16,
    /// Precipitation in mm
    #[serde(rename = "precipitation")]
    pub precipitation_mm: f64,
    /// Cloud cover in %
    #[serde(rename = "clouds")]
    pub cloud_cover_percent: f64,
    /// Visibility in km
    #[serde(rename = "visibility")]
    pub visibility_km: f64,
}

impl MeasurementSnapshot {
    /// Calm, dry conditions that score nothing on any band
    pub fn calm() -> Self {
        Self {
            temperature_celsius: 18.0,
            humidity_percent: 50.0,
            pressure_hpa: 1015.0,
            wind_speed_kmh: 10.0,
            wind_direction_deg: 270,
            precipitation_mm: 2.0,
            cloud_cover_percent: 20.0,
            visibility_km: 10.0,
        }
    }
}
