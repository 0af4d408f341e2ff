//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own against an already migrated database.
//!
//! ## Intended use
//! Useful for development and debugging. The workspace's main `techmed-run` binary also
//! migrates the schema and seeds an empty database in development mode before serving.

use api_rest::{build_router, AppState, RestConfig};
use techmed_core::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the TechMed REST API server
///
/// # Environment Variables
/// - `TECHMED_REST_ADDR`: Server address (default: "0.0.0.0:8000")
/// - `TECHMED_JWT_SECRET`: Token signing secret (required)
/// - `DATABASE_URL`: SQLite database (default: "sqlite://techmed.db")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid or the database cannot be opened,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = RestConfig::from_env()?;
    tracing::info!("-- Starting TechMed REST API on {}", cfg.addr);

    let db = Database::connect(cfg.core.database_url()).await?;
    let state = AppState::from_config(db, &cfg)?;
    let app = build_router(state, cfg.cors_origins.clone());

    let listener = tokio::net::TcpListener::bind(&cfg.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
