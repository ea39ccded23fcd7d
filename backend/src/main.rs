//! Tornado Risk Monitor - Backend Server

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trm_backend::{config, create_app, database, external, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "trm_server=debug,trm_backend=debug,tower_http=debug,sqlx=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Tornado Risk Monitor Server");
    tracing::info!("Environment: {}", config.environment);

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = database::connect(&config.database).await?;
    tracing::info!("Database connection established");

    let provider = external::build_provider(&config.provider)?;
    tracing::info!("Reading provider: {:?}", config.provider.kind);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    // Create application state
    let state = AppState {
        db: db_pool,
        config: Arc::new(config),
        provider,
    };

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
