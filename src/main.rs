use dotenvy::dotenv;
use energysim_api::{
    api::{self, AppState},
    config::{self, database},
    errors::{Error, Result},
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load configuration
    let app_config = config::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    let runner_config = app_config.simulation.runner_config()?;
    tokio::fs::create_dir_all(&runner_config.output_dir).await?;
    info!(
        idf_dir = %runner_config.idf_dir.display(),
        output_dir = %runner_config.output_dir.display(),
        timeout_secs = runner_config.timeout.as_secs(),
        "Simulation settings loaded"
    );

    // 4. Connect to the database and create tables
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Serve the API
    let app = api::router(AppState::new(db, Arc::new(runner_config)));
    let addr = app_config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", addr, e))?;
    info!("listening on {}", addr);

    axum::serve(listener, app).await.map_err(Error::from)?;

    Ok(())
}
