//! City import tool for the Tornado Risk Monitor

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trm_backend::{config::Config, database, services::CatalogService};

/// Import cities from a CSV file (`Name,Latitude,Longitude`, e.g.
/// `Berlin,52.5200,13.4050`) into the catalog.
///
/// A header row is detected and skipped. Rows already in the catalog are
/// skipped. The database defaults to the server configuration
/// (`config/{environment}.toml`, `TRM_DATABASE__URL`).
#[derive(Parser, Debug)]
#[command(name = "trm-import-cities", version)]
struct Args {
    /// Path to the CSV file
    #[arg(default_value = "cities.csv")]
    csv_file: PathBuf,

    /// SQLite URL, overriding the configured database
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trm_backend=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let mut database = Config::load()?.database;
    if let Some(url) = args.database_url {
        database.url = url;
    }
    database.max_connections = 1;
    database.min_connections = 1;

    tracing::info!("CSV file: {}", args.csv_file.display());
    tracing::info!("Database: {}", database.url);

    let file = File::open(&args.csv_file)
        .with_context(|| format!("Cannot open CSV file '{}'", args.csv_file.display()))?;
    let pool = database::connect(&database)
        .await
        .with_context(|| format!("Cannot open database '{}'", database.url))?;

    let summary = CatalogService::new(pool).import_csv(file).await?;

    for error in &summary.errors {
        tracing::warn!("Line {}: {}", error.line, error.message);
    }

    println!("Imported:           {} cities", summary.imported);
    println!("Already present:    {} rows", summary.duplicates);
    if !summary.errors.is_empty() {
        println!("Rejected:           {} rows", summary.errors.len());
    }
    println!("Total in database:  {} cities", summary.total_in_database);

    Ok(())
}
