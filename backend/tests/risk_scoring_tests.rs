//! Property tests for the additive risk score

use proptest::prelude::*;
use shared::{calculate_risk_score, risk_points, MeasurementSnapshot, RiskScore};

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

prop_compose! {
    fn any_snapshot()(
        temp in -30.0f64..50.0,
        humidity in 0.0f64..=100.0,
        pressure in 900.0f64..1080.0,
        wind in 0.0f64..200.0,
        precip in 0.0f64..100.0,
        clouds in 0.0f64..=100.0,
        visibility in 0.0f64..50.0,
        direction in 0u16..360,
    ) -> MeasurementSnapshot {
        MeasurementSnapshot {
            cloud_cover_percent: clouds,
            visibility_km: visibility,
            wind_direction_deg: direction,
            ..snapshot(temp, humidity, pressure, wind, precip)
        }
    }
}

#[test]
fn test_severe_conditions_clamp_to_maximum() {
    let severe = snapshot(32.0, 85.0, 985.0, 45.0, 20.0);
    assert_eq!(risk_points(&severe), 17);
    assert_eq!(calculate_risk_score(&severe), RiskScore::MAX);
}

#[test]
fn test_calm_conditions_clamp_to_minimum() {
    let calm = snapshot(18.0, 50.0, 1015.0, 10.0, 2.0);
    assert_eq!(risk_points(&calm), 0);
    assert_eq!(calculate_risk_score(&calm), RiskScore::MIN);
}

#[test]
fn test_moderate_conditions() {
    // temperature 2, humidity 2, wind 3
    let moderate = snapshot(27.0, 75.0, 1005.0, 35.0, 5.0);
    assert_eq!(calculate_risk_score(&moderate).value(), 7);
}

proptest! {
    #[test]
    fn prop_score_within_bounds(s in any_snapshot()) {
        let score = calculate_risk_score(&s).value();
        prop_assert!((1..=10).contains(&score));
    }

    #[test]
    fn prop_score_is_deterministic(s in any_snapshot()) {
        prop_assert_eq!(calculate_risk_score(&s), calculate_risk_score(&s));
    }

    #[test]
    fn prop_hotter_never_lowers_score(s in any_snapshot(), delta in 0.0f64..30.0) {
        let hotter = MeasurementSnapshot {
            temperature_celsius: s.temperature_celsius + delta,
            ..s
        };
        prop_assert!(calculate_risk_score(&hotter) >= calculate_risk_score(&s));
    }

    #[test]
    fn prop_more_humid_never_lowers_score(s in any_snapshot(), delta in 0.0f64..50.0) {
        let humid = MeasurementSnapshot {
            humidity_percent: (s.humidity_percent + delta).min(100.0),
            ..s
        };
        prop_assert!(calculate_risk_score(&humid) >= calculate_risk_score(&s));
    }

    #[test]
    fn prop_lower_pressure_never_lowers_score(s in any_snapshot(), delta in 0.0f64..60.0) {
        let low = MeasurementSnapshot {
            pressure_hpa: s.pressure_hpa - delta,
            ..s
        };
        prop_assert!(calculate_risk_score(&low) >= calculate_risk_score(&s));
    }

    #[test]
    fn prop_windier_never_lowers_score(s in any_snapshot(), delta in 0.0f64..60.0) {
        let windy = MeasurementSnapshot {
            wind_speed_kmh: s.wind_speed_kmh + delta,
            ..s
        };
        prop_assert!(calculate_risk_score(&windy) >= calculate_risk_score(&s));
    }

    #[test]
    fn prop_wetter_never_lowers_score(s in any_snapshot(), delta in 0.0f64..30.0) {
        let wet = MeasurementSnapshot {
            precipitation_mm: s.precipitation_mm + delta,
            ..s
        };
        prop_assert!(calculate_risk_score(&wet) >= calculate_risk_score(&s));
    }

    #[test]
    fn prop_unscored_fields_do_not_matter(
        s in any_snapshot(),
        clouds in 0.0f64..=100.0,
        visibility in 0.0f64..50.0,
        direction in 0u16..360,
    ) {
        let other = MeasurementSnapshot {
            cloud_cover_percent: clouds,
            visibility_km: visibility,
            wind_direction_deg: direction,
            ..s
        };
        prop_assert_eq!(calculate_risk_score(&other), calculate_risk_score(&s));
    }
}
