//! Validation utilities for the Tornado Risk Monitor
//!
//! Used by the catalog importer; the ingestion cycle trusts its catalog.

/// Longest accepted city name
pub const MAX_CITY_NAME_LEN: usize = 200;

// ============================================================================
// Geographic Validations
// ============================================================================

/// Validate latitude is within [-90, 90]
pub fn validate_latitude(latitude: f64) -> Result<(), &'static str> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    Ok(())
}

/// Validate longitude is within [-180, 180]
pub fn validate_longitude(longitude: f64) -> Result<(), &'static str> {
    if !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

// ============================================================================
// Catalog Validations
// ============================================================================

/// Validate a city name (non-blank, bounded length)
pub fn validate_city_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("City name is missing");
    }
    if name.chars().count() > MAX_CITY_NAME_LEN {
        return Err("City name must be at most 200 characters");
    }
    Ok(())
}

/// Check whether a catalog row is a header row (`name,latitude,longitude`)
pub fn is_catalog_header(first_field: &str) -> bool {
    first_field.trim().eq_ignore_ascii_case("name")
}
