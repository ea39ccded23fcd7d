//! Test doubles and fixtures shared by the integration tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use shared::{Location, MeasurementSnapshot, RiskRecord};
use sqlx::SqlitePool;
use trm_backend::config::{Config, DatabaseConfig};
use trm_backend::error::{ProviderError, StorageError};
use trm_backend::services::ReadingStore;
use trm_backend::{database, AppState, ReadingProvider};

/// Fresh migrated in-memory database
pub async fn memory_pool() -> SqlitePool {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        ..DatabaseConfig::default()
    };
    database::connect(&config).await.expect("in-memory database")
}

pub fn snapshot(
    temp: f64,
    humidity: f64,
    pressure: f64,
    wind: f64,
    precip: f64,
) -> MeasurementSnapshot {
    MeasurementSnapshot {
        temperature_celsius: temp,
        humidity_percent: humidity,
        pressure_hpa: pressure,
        wind_speed_kmh: wind,
        precipitation_mm: precip,
        ..MeasurementSnapshot::calm()
    }
}

pub fn catalog(names: &[&str]) -> Vec<Location> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Location::new(*name, 48.0 + i as f64, 9.0 + i as f64))
        .collect()
}

/// Provider answering from a fixed table; unknown cities fail
#[derive(Default)]
pub struct FakeProvider {
    readings: HashMap<String, MeasurementSnapshot>,
    failing: HashSet<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reading(mut self, city: &str, snapshot: MeasurementSnapshot) -> Self {
        self.readings.insert(city.to_string(), snapshot);
        self
    }

    pub fn failing_for(mut self, city: &str) -> Self {
        self.failing.insert(city.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReadingProvider for FakeProvider {
    async fn fetch(&self, location: &Location) -> Result<MeasurementSnapshot, ProviderError> {
        self.calls.lock().unwrap().push(location.name.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(&location.name) {
            return Err(ProviderError::Unreachable(format!("no station near {}", location.name)));
        }
        Ok(self
            .readings
            .get(&location.name)
            .copied()
            .unwrap_or_else(MeasurementSnapshot::calm))
    }
}

/// In-memory store that can be told to reject a city
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, RiskRecord>>,
    rejecting: HashSet<String>,
}

impl MemoryStore {
    pub fn rejecting(city: &str) -> Self {
        Self {
            rejecting: HashSet::from([city.to_string()]),
            ..Self::default()
        }
    }

    pub fn get(&self, city: &str) -> Option<RiskRecord> {
        self.records.lock().unwrap().get(city).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl ReadingStore for MemoryStore {
    async fn upsert(&self, record: &RiskRecord) -> Result<(), StorageError> {
        if self.rejecting.contains(&record.location.name) {
            return Err(StorageError::Unavailable("disk full".to_string()));
        }
        self.records
            .lock()
            .unwrap()
            .insert(record.location.name.clone(), record.clone());
        Ok(())
    }
}

pub fn app_state(db: SqlitePool, provider: Arc<dyn ReadingProvider>) -> AppState {
    AppState {
        db,
        config: Arc::new(Config::default()),
        provider,
    }
}
