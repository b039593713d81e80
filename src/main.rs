use std::path::Path;

use stock_ledger::{
    api::{self, AppState},
    config,
    errors::Result,
};
use dotenvy::dotenv;
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

    // 3. Connect and create tables
    let db = config::database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db)
        .await
        .inspect(|()| info!("Database tables ready."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 4. Seed reference data when a config.toml is present
    if Path::new("config.toml").exists() {
        let seed = config::seed::load_default_config()
            .inspect_err(|e| error!("Failed to load config.toml: {}", e))?;
        config::seed::seed_database(&db, &seed)
            .await
            .inspect_err(|e| error!("Failed to seed database: {}", e))?;
    }

    // 5. Serve
    let address = config::server::get_bind_address()?;
    let listener = tokio::net::TcpListener::bind(address).await?;
    info!("Listening on {}", address);

    axum::serve(listener, api::build_router(AppState { db })).await?;
    Ok(())
}
