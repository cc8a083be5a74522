use dotenvy::dotenv;
use eyre::{Result, WrapErr, eyre};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use conservador_fleet::alerts::engine::AlertEvaluator;
use conservador_fleet::alerts::thresholds::ThresholdOverrides;
use conservador_fleet::config;
use conservador_fleet::db::db_manager::DbManager;
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

    let raw_id = std::env::args()
        .nth(1)
        .ok_or_else(|| eyre!("usage: evaluate_unit <conservador-uuid>"))?;
    let unit_id = Uuid::parse_str(raw_id.trim()).wrap_err_with(|| format!("invalid conservador id {raw_id:?}"))?;

    let cfg = config::Config::load()?;
    let db_manager = Arc::new(DbManager::init(&cfg).await?);
    info!(%unit_id, "Database manager initialized");

    let evaluator = AlertEvaluator::new(db_manager).with_base_overrides(cfg.threshold_overrides);
    let alerts = evaluator.evaluate(unit_id, &ThresholdOverrides::default()).await?;

    println!("{}", serde_json::to_string_pretty(&alerts)?);
    Ok(())
}
