//! Location catalog models

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::validation::{validate_city_name, validate_latitude, validate_longitude};

/// A monitored location
///
/// Stored records are keyed by the name together with the coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }
}

impl Validate for Location {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let checks = [
            ("name", "length", validate_city_name(&self.name)),
            ("latitude", "range", validate_latitude(self.latitude)),
            ("longitude", "range", validate_longitude(self.longitude)),
        ];
        for (field, code, outcome) in checks {
            if let Err(message) = outcome {
                let mut error = ValidationError::new(code);
                error.message = Some(message.into());
                errors.add(field, error);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Catalog used when no cities have been imported yet
pub fn default_catalog() -> Vec<Location> {
    vec![
        Location::new("Berlin", 52.5200, 13.4050),
        Location::new("Hamburg", 53.5511, 9.9937),
        Location::new("München", 48.1351, 11.5820),
        Location::new("Köln", 50.9375, 6.9603),
        Location::new("Frankfurt", 50.1109, 8.6821),
    ]
}
