//! Tornado risk scoring and the persisted risk record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Location, MeasurementSnapshot};

/// Risk indicator, always within [`RiskScore::MIN`, `RiskScore::MAX`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RiskScore(u8);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("risk score {0} is outside 1..=10")]
pub struct RiskScoreOutOfRange(pub i64);

impl RiskScore {
    pub const MIN: RiskScore = RiskScore(1);
    pub const MAX: RiskScore = RiskScore(10);

    /// Clamp a raw point total into the score range
    pub fn clamped(points: u32) -> Self {
        let bounded = points.clamp(Self::MIN.0 as u32, Self::MAX.0 as u32);
        RiskScore(bounded as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for RiskScore {
    type Error = RiskScoreOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (Self::MIN.0 as i64..=Self::MAX.0 as i64).contains(&value) {
            Ok(RiskScore(value as u8))
        } else {
            Err(RiskScoreOutOfRange(value))
        }
    }
}

impl From<RiskScore> for i64 {
    fn from(score: RiskScore) -> Self {
        score.0 as i64
    }
}

impl std::fmt::Display for RiskScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Points for a reading that exceeds each threshold (bands are cumulative)
fn points_above(value: f64, bands: &[(f64, u32)]) -> u32 {
    bands
        .iter()
        .filter(|(threshold, _)| value > *threshold)
        .map(|(_, points)| points)
        .sum()
}

/// Points for a reading that falls below each threshold (bands are cumulative)
fn points_below(value: f64, bands: &[(f64, u32)]) -> u32 {
    bands
        .iter()
        .filter(|(threshold, _)| value < *threshold)
        .map(|(_, points)| points)
        .sum()
}

const TEMPERATURE_BANDS: [(f64, u32); 2] = [(25.0, 2), (30.0, 1)];
const HUMIDITY_BANDS: [(f64, u32); 2] = [(70.0, 2), (80.0, 1)];
const PRESSURE_BANDS: [(f64, u32); 2] = [(1000.0, 2), (990.0, 2)];
const WIND_SPEED_BANDS: [(f64, u32); 2] = [(30.0, 3), (40.0, 2)];
const PRECIPITATION_BANDS: [(f64, u32); 2] = [(10.0, 1), (15.0, 1)];

/// Raw point total before clamping
///
/// Wind direction, cloud cover and visibility never contribute.
pub fn risk_points(snapshot: &MeasurementSnapshot) -> u32 {
    points_above(snapshot.temperature_celsius, &TEMPERATURE_BANDS)
        + points_above(snapshot.humidity_percent, &HUMIDITY_BANDS)
        + points_below(snapshot.pressure_hpa, &PRESSURE_BANDS)
        + points_above(snapshot.wind_speed_kmh, &WIND_SPEED_BANDS)
        + points_above(snapshot.precipitation_mm, &PRECIPITATION_BANDS)
}

/// Calculate the tornado risk score for a snapshot
pub fn calculate_risk_score(snapshot: &MeasurementSnapshot) -> RiskScore {
    RiskScore::clamped(risk_points(snapshot))
}

/// Current risk state of one location (latest wins)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskRecord {
    pub location: Location,
    pub snapshot: MeasurementSnapshot,
    pub score: RiskScore,
    pub recorded_at: DateTime<Utc>,
}

impl RiskRecord {
    /// Score a fresh snapshot and stamp it
    pub fn scored(
        location: Location,
        snapshot: MeasurementSnapshot,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            score: calculate_risk_score(&snapshot),
            location,
            snapshot,
            recorded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(
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

    #[test]
    fn test_severe_conditions_clamp_to_ten() {
        let severe = snapshot(32.0, 85.0, 985.0, 45.0, 18.0);
        assert_eq!(risk_points(&severe), 17);
        assert_eq!(calculate_risk_score(&severe), RiskScore::MAX);
    }

    #[test]
    fn test_calm_conditions_clamp_to_one() {
        let calm = snapshot(18.0, 50.0, 1015.0, 10.0, 2.0);
        assert_eq!(risk_points(&calm), 0);
        assert_eq!(calculate_risk_score(&calm), RiskScore::MIN);
    }

    #[test]
    fn test_bands_are_cumulative() {
        assert_eq!(risk_points(&snapshot(26.0, 50.0, 1015.0, 10.0, 0.0)), 2);
        assert_eq!(risk_points(&snapshot(31.0, 50.0, 1015.0, 10.0, 0.0)), 3);
        assert_eq!(risk_points(&snapshot(18.0, 50.0, 995.0, 10.0, 0.0)), 2);
        assert_eq!(risk_points(&snapshot(18.0, 50.0, 985.0, 10.0, 0.0)), 4);
        assert_eq!(risk_points(&snapshot(18.0, 50.0, 1015.0, 35.0, 0.0)), 3);
        assert_eq!(risk_points(&snapshot(18.0, 50.0, 1015.0, 41.0, 0.0)), 5);
    }

    #[test]
    fn test_thresholds_are_strict() {
        // Exactly on a threshold scores nothing for that band
        let edge = snapshot(25.0, 70.0, 1000.0, 30.0, 10.0);
        assert_eq!(risk_points(&edge), 0);
        let upper_edge = snapshot(30.0, 80.0, 990.0, 40.0, 15.0);
        assert_eq!(risk_points(&upper_edge), 2 + 2 + 2 + 3 + 1);
    }

    #[test]
    fn test_unscored_fields_are_ignored() {
        let base = snapshot(28.0, 75.0, 995.0, 35.0, 12.0);
        let mut varied = base;
        varied.wind_direction_deg = 45;
        varied.cloud_cover_percent = 100.0;
        varied.visibility_km = 0.1;
        assert_eq!(calculate_risk_score(&base), calculate_risk_score(&varied));
    }

    #[test]
    fn test_risk_score_conversions() {
        assert_eq!(RiskScore::try_from(7).map(RiskScore::value), Ok(7));
        assert_eq!(RiskScore::try_from(0), Err(RiskScoreOutOfRange(0)));
        assert_eq!(RiskScore::try_from(11), Err(RiskScoreOutOfRange(11)));
        assert_eq!(i64::from(RiskScore::clamped(4)), 4);
        assert!(serde_json::from_str::<RiskScore>("12").is_err());
        assert_eq!(serde_json::to_string(&RiskScore::clamped(99)).unwrap(), "10");
    }
}
