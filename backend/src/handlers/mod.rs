//! HTTP handlers

pub mod catalog;
pub mod health;
pub mod ingestion;
pub mod risk;

pub use catalog::list_cities;
pub use health::health_check;
pub use ingestion::{method_not_allowed, update_weather};
pub use risk::{get_risk_record, list_risk_records};
