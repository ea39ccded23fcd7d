//! Shared types and models for the Tornado Risk Monitor
//!
//! This crate contains the domain types and the risk scoring rules used by
//! the backend server and the catalog import tool. It performs no I/O.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
