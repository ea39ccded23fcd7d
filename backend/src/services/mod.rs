//! Business logic services for the Tornado Risk Monitor

pub mod catalog;
pub mod ingestion;
pub mod risk_store;

pub use catalog::CatalogService;
pub use ingestion::{BatchResult, IngestionOptions, IngestionService, LocationOutcome};
pub use risk_store::{ReadingStore, RiskRecordStore};
