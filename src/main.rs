use api_rest::{build_router, AppState, RestConfig};
use techmed_core::{seed, Database};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the TechMed application
///
/// Opens (and creates if missing) the database, brings the schema up to date, seeds an empty
/// database when development mode is on, then serves the REST API.
///
/// # Environment Variables
/// - `TECHMED_REST_ADDR`: REST server address (default: "0.0.0.0:8000")
/// - `TECHMED_JWT_SECRET`: Token signing secret (required)
/// - `DATABASE_URL`: SQLite database (default: "sqlite://techmed.db")
/// - `TECHMED_DEV_MODE`: Seed an empty database and enable `/misc/reset` (default: false)
///
/// See `RestConfig` for the remaining variables.
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, migration, seeding or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("techmed_run=info".parse()?)
                .add_directive("techmed_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = RestConfig::from_env()?;
    tracing::info!("++ Starting TechMed REST on {}", cfg.addr);

    let db = Database::connect(cfg.core.database_url()).await?;
    db.migrate().await?;

    let state = AppState::from_config(db.clone(), &cfg)?;
    if cfg.core.dev_mode() && db.is_empty().await? {
        let today = chrono::Local::now().date_naive();
        seed::insert_mock_data(&db, &state.credentials, today).await?;
    }

    let app = build_router(state, cfg.cors_origins.clone());
    let listener = tokio::net::TcpListener::bind(&cfg.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
