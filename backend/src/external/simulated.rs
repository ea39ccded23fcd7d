//! Simulated reading provider for demos and local development

use std::sync::Mutex;

use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use shared::{Location, MeasurementSnapshot};

use super::ReadingProvider;
use crate::error::ProviderError;

/// Produces plausible random readings within fixed ranges
///
/// A seeded instance yields the same sequence of readings on every run.
pub struct SimulatedProvider {
    rng: Mutex<StdRng>,
}

impl SimulatedProvider {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn sample(rng: &mut StdRng) -> MeasurementSnapshot {
        MeasurementSnapshot {
            temperature_celsius: rng.gen_range(15..=35) as f64,
            humidity_percent: rng.gen_range(40..=90) as f64,
            pressure_hpa: rng.gen_range(980..=1030) as f64,
            wind_speed_kmh: rng.gen_range(5..=50) as f64,
            wind_direction_deg: rng.gen_range(0..360),
            precipitation_mm: rng.gen_range(0..=20) as f64,
            cloud_cover_percent: rng.gen_range(0..=100) as f64,
            visibility_km: rng.gen_range(5..=15) as f64,
        }
    }
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadingProvider for SimulatedProvider {
    async fn fetch(&self, location: &Location) -> Result<MeasurementSnapshot, ProviderError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| ProviderError::Unreachable("simulator state poisoned".to_string()))?;
        let snapshot = Self::sample(&mut rng);
        tracing::trace!(city = %location.name, ?snapshot, "Simulated reading");
        Ok(snapshot)
    }
}
