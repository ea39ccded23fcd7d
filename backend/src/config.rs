//! Configuration management for the Tornado Risk Monitor
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides (`TRM_DATABASE__URL`, `TRM_SERVER__PORT`, ...)

use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Reading provider configuration
    pub provider: ProviderConfig,

    /// Ingestion cycle tuning
    pub ingestion: IngestionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Apply embedded migrations on startup
    pub run_migrations: bool,
}

/// Which reading provider backs the ingestion cycle
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Randomized readings for demos and local development
    Simulated,
    /// OpenWeatherMap current conditions
    OpenWeatherMap,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,

    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key
    pub api_key: String,

    /// Per-location fetch timeout in seconds
    pub timeout_secs: u64,

    /// Seed for the simulated provider
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestionConfig {
    /// Per-location store timeout in seconds
    pub store_timeout_secs: u64,

    /// Locations processed at once; 1 keeps the cycle sequential
    pub max_concurrency: usize,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("TRM_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        Self::build(&environment, env_overrides())
    }

    fn build(environment: &str, overrides: Environment) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment)?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.url", "sqlite://tornado.sqlite")?
            .set_default("database.max_connections", 5)?
            .set_default("database.min_connections", 1)?
            .set_default("database.run_migrations", true)?
            .set_default("provider.kind", "simulated")?
            .set_default("provider.api_endpoint", "https://api.openweathermap.org/data/2.5")?
            .set_default("provider.api_key", "")?
            .set_default("provider.timeout_secs", 10)?
            .set_default("ingestion.store_timeout_secs", 5)?
            .set_default("ingestion.max_concurrency", 1)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables
            .add_source(overrides)
            .build()?;

        config.try_deserialize()
    }
}

/// `TRM_<SECTION>__<KEY>`, e.g. `TRM_DATABASE__URL`
fn env_overrides() -> Environment {
    Environment::with_prefix("TRM")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl IngestionConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://tornado.sqlite".to_string(),
            max_connections: 5,
            min_connections: 1,
            run_migrations: true,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Simulated,
            api_endpoint: "https://api.openweathermap.org/data/2.5".to_string(),
            api_key: String::new(),
            timeout_secs: 10,
            seed: None,
        }
    }
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            store_timeout_secs: 5,
            max_concurrency: 1,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            provider: ProviderConfig::default(),
            ingestion: IngestionConfig::default(),
        }
    }
}
