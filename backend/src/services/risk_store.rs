//! Persistence of the current risk record per location

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{Location, MeasurementSnapshot, RiskRecord, RiskScore};
use sqlx::{FromRow, SqlitePool};

use crate::error::{AppError, AppResult, StorageError};

/// Write side of the risk record table
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Insert or replace the current record for the record's location
    async fn upsert(&self, record: &RiskRecord) -> Result<(), StorageError>;
}

/// SQLite-backed risk record store
#[derive(Clone)]
pub struct RiskRecordStore {
    db: SqlitePool,
}

/// Row layout of `weather_data`
#[derive(Debug, FromRow)]
struct RiskRecordRow {
    city_name: String,
    latitude: f64,
    longitude: f64,
    temperature: f64,
    humidity: f64,
    pressure: f64,
    wind_speed: f64,
    wind_direction: i64,
    precipitation: f64,
    clouds: f64,
    visibility: f64,
    tornado_score: i64,
    timestamp: DateTime<Utc>,
}

impl TryFrom<RiskRecordRow> for RiskRecord {
    type Error = AppError;

    fn try_from(row: RiskRecordRow) -> Result<Self, Self::Error> {
        let score = RiskScore::try_from(row.tornado_score).map_err(|e| {
            AppError::Internal(format!("Stored record for {}: {}", row.city_name, e))
        })?;
        let wind_direction_deg = u16::try_from(row.wind_direction).map_err(|_| {
            AppError::Internal(format!(
                "Stored record for {} has wind direction {}",
                row.city_name, row.wind_direction
            ))
        })?;

        Ok(RiskRecord {
            location: Location::new(row.city_name, row.latitude, row.longitude),
            snapshot: MeasurementSnapshot {
                temperature_celsius: row.temperature,
                humidity_percent: row.humidity,
                pressure_hpa: row.pressure,
                wind_speed_kmh: row.wind_speed,
                wind_direction_deg,
                precipitation_mm: row.precipitation,
                cloud_cover_percent: row.clouds,
                visibility_km: row.visibility,
            },
            score,
            recorded_at: row.timestamp,
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT city_name, latitude, longitude, temperature, humidity, pressure,
           wind_speed, wind_direction, precipitation, clouds, visibility,
           tornado_score, timestamp
    FROM weather_data
"#;

impl RiskRecordStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// All current records, by city name
    pub async fn list_latest(&self) -> AppResult<Vec<RiskRecord>> {
        let rows = sqlx::query_as::<_, RiskRecordRow>(&format!(
            "{SELECT_COLUMNS} ORDER BY city_name, latitude, longitude"
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(RiskRecord::try_from).collect()
    }

    /// Most recent record stored under `city_name`
    pub async fn get_latest(&self, city_name: &str) -> AppResult<Option<RiskRecord>> {
        let row = sqlx::query_as::<_, RiskRecordRow>(&format!(
            "{SELECT_COLUMNS} WHERE city_name = ? ORDER BY timestamp DESC LIMIT 1"
        ))
        .bind(city_name)
        .fetch_optional(&self.db)
        .await?;

        row.map(RiskRecord::try_from).transpose()
    }

    /// Number of current records
    pub async fn count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM weather_data")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ReadingStore for RiskRecordStore {
    async fn upsert(&self, record: &RiskRecord) -> Result<(), StorageError> {
        let snapshot = &record.snapshot;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO weather_data
                (city_name, latitude, longitude, temperature, humidity, pressure,
                 wind_speed, wind_direction, precipitation, clouds, visibility,
                 tornado_score, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.location.name)
        .bind(record.location.latitude)
        .bind(record.location.longitude)
        .bind(snapshot.temperature_celsius)
        .bind(snapshot.humidity_percent)
        .bind(snapshot.pressure_hpa)
        .bind(snapshot.wind_speed_kmh)
        .bind(i64::from(snapshot.wind_direction_deg))
        .bind(snapshot.precipitation_mm)
        .bind(snapshot.cloud_cover_percent)
        .bind(snapshot.visibility_km)
        .bind(i64::from(record.score))
        .bind(record.recorded_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}
