//! Ingestion cycle: fetch, score and store the current reading of every
//! catalog location
//!
//! A failing location never aborts the cycle; its failure is recorded in the
//! [`BatchResult`] and the next location is processed.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{Location, MeasurementSnapshot, RiskRecord};
use tokio::{sync::Semaphore, task::JoinSet, time::timeout};

use crate::config::Config;
use crate::error::{ProviderError, StorageError};
use crate::external::ReadingProvider;
use crate::services::risk_store::ReadingStore;

/// Tuning for one ingestion cycle
#[derive(Debug, Clone, Copy)]
pub struct IngestionOptions {
    pub provider_timeout: Duration,
    pub store_timeout: Duration,
    /// Locations processed at once; 1 keeps the cycle sequential
    pub max_concurrency: usize,
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(10),
            store_timeout: Duration::from_secs(5),
            max_concurrency: 1,
        }
    }
}

impl From<&Config> for IngestionOptions {
    fn from(config: &Config) -> Self {
        Self {
            provider_timeout: config.provider.timeout(),
            store_timeout: config.ingestion.store_timeout(),
            max_concurrency: config.ingestion.max_concurrency,
        }
    }
}

/// Step of the per-location pipeline that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Provider,
    Storage,
}

/// A location that could not be ingested
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationFailure {
    pub location: Location,
    pub stage: FailureStage,
    pub message: String,
}

/// Result of one location within a cycle
#[derive(Debug, Clone, PartialEq)]
pub enum LocationOutcome {
    Stored(RiskRecord),
    Failed(LocationFailure),
}

/// Outcomes of one cycle, in catalog order
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub started_at: DateTime<Utc>,
    pub outcomes: Vec<LocationOutcome>,
}

impl BatchResult {
    pub fn successes(&self) -> impl Iterator<Item = &RiskRecord> {
        self.outcomes.iter().filter_map(|o| match o {
            LocationOutcome::Stored(record) => Some(record),
            LocationOutcome::Failed(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &LocationFailure> {
        self.outcomes.iter().filter_map(|o| match o {
            LocationOutcome::Failed(failure) => Some(failure),
            LocationOutcome::Stored(_) => None,
        })
    }

    pub fn succeeded(&self) -> usize {
        self.successes().count()
    }

    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

/// Runs ingestion cycles against injected collaborators
#[derive(Clone)]
pub struct IngestionService {
    provider: Arc<dyn ReadingProvider>,
    store: Arc<dyn ReadingStore>,
    options: IngestionOptions,
}

impl IngestionService {
    pub fn new(
        provider: Arc<dyn ReadingProvider>,
        store: Arc<dyn ReadingStore>,
        options: IngestionOptions,
    ) -> Self {
        Self {
            provider,
            store,
            options,
        }
    }

    /// Process every location of `catalog` once
    pub async fn run_cycle(&self, catalog: &[Location]) -> BatchResult {
        let started_at = Utc::now();
        tracing::info!(
            locations = catalog.len(),
            concurrency = self.options.max_concurrency,
            "Starting ingestion cycle"
        );

        let outcomes = if self.options.max_concurrency <= 1 {
            let mut outcomes = Vec::with_capacity(catalog.len());
            for location in catalog {
                outcomes.push(self.process_location(location).await);
            }
            outcomes
        } else {
            self.run_pooled(catalog).await
        };

        let result = BatchResult {
            started_at,
            outcomes,
        };
        tracing::info!(
            succeeded = result.succeeded(),
            failed = result.failed(),
            "Ingestion cycle finished"
        );
        result
    }

    /// Bounded worker pool; each worker hands back `(index, outcome)`
    async fn run_pooled(&self, catalog: &[Location]) -> Vec<LocationOutcome> {
        // Never more permits than workers; also keeps below Semaphore::MAX_PERMITS
        let width = self.options.max_concurrency.min(catalog.len().max(1));
        let permits = Arc::new(Semaphore::new(width));
        let mut workers = JoinSet::new();

        for (index, location) in catalog.iter().cloned().enumerate() {
            let service = self.clone();
            let permits = Arc::clone(&permits);
            workers.spawn(async move {
                let _permit = permits.acquire_owned().await;
                (index, service.process_location(&location).await)
            });
        }

        let mut slots: Vec<Option<LocationOutcome>> = vec![None; catalog.len()];
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => tracing::error!("Location worker terminated: {}", e),
            }
        }

        slots
            .into_iter()
            .zip(catalog)
            .map(|(slot, location)| {
                slot.unwrap_or_else(|| {
                    LocationOutcome::Failed(LocationFailure {
                        location: location.clone(),
                        stage: FailureStage::Provider,
                        message: "location worker terminated unexpectedly".to_string(),
                    })
                })
            })
            .collect()
    }

    #[tracing::instrument(skip(self, location), fields(city = %location.name))]
    async fn process_location(&self, location: &Location) -> LocationOutcome {
        let snapshot = match self.fetch_reading(location).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Reading failed: {}", e);
                return failure(location, FailureStage::Provider, e.to_string());
            }
        };

        let record = RiskRecord::scored(location.clone(), snapshot, Utc::now());

        match self.store_record(&record).await {
            Ok(()) => {
                tracing::debug!(score = record.score.value(), "Risk record stored");
                LocationOutcome::Stored(record)
            }
            Err(e) => {
                tracing::warn!("Storing risk record failed: {}", e);
                failure(location, FailureStage::Storage, e.to_string())
            }
        }
    }

    async fn fetch_reading(
        &self,
        location: &Location,
    ) -> Result<MeasurementSnapshot, ProviderError> {
        let limit = self.options.provider_timeout;
        timeout(limit, self.provider.fetch(location))
            .await
            .unwrap_or(Err(ProviderError::Timeout(limit)))
    }

    async fn store_record(&self, record: &RiskRecord) -> Result<(), StorageError> {
        let limit = self.options.store_timeout;
        timeout(limit, self.store.upsert(record))
            .await
            .unwrap_or(Err(StorageError::Timeout(limit)))
    }
}

fn failure(location: &Location, stage: FailureStage, message: String) -> LocationOutcome {
    LocationOutcome::Failed(LocationFailure {
        location: location.clone(),
        stage,
        message,
    })
}
