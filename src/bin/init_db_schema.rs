use dotenvy::dotenv;
use eyre::Result;
use tracing::info;

use conservador_fleet::config;
use conservador_fleet::db::{connection, schema};
use conservador_fleet::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    dotenv().ok();

    // Initialize logging
    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME").to_string()) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e.into());
    }

    let cfg = config::Config::load()?;
    info!(db_max_connections = cfg.db_max_connections, "Configuration loaded and logging initialized");

    // Initialize database connection pool
    let pool = connection::create_pool(&cfg).await?;
    info!("Database connection pool created");

    // Initialize database schema
    schema::init_schema(&pool).await?;
    info!("Database schema initialized");

    pool.close().await;
    Ok(())
}
