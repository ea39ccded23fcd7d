//! SQLite connection pool and embedded migrations

use std::{str::FromStr, time::Duration};

use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::config::DatabaseConfig;
use crate::error::AppResult;

/// Schema migrations compiled into the binary
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Open the connection pool described by `config`
///
/// In-memory databases live only as long as their connection, so the pool
/// keeps its connections open indefinitely in that case.
pub async fn connect(config: &DatabaseConfig) -> AppResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let in_memory = config.url.contains(":memory:");
    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(30));
    if in_memory {
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options.connect_with(options).await?;

    if config.run_migrations {
        tracing::info!("Running database migrations...");
        MIGRATOR.run(&pool).await?;
        tracing::info!("Migrations completed");
    }

    Ok(pool)
}
