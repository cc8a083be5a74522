use dotenvy::dotenv;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use std::sync::Arc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use conservador_fleet::alerts::engine::AlertEvaluator;
use conservador_fleet::alerts::fleet::{self, UnitEvaluation};
use conservador_fleet::alerts::thresholds::ThresholdOverrides;
use conservador_fleet::alerts::types::Alert;
use conservador_fleet::config;
use conservador_fleet::db::db_manager::DbManager;
use conservador_fleet::logging;

const ALERTS_CHANNEL: &str = "conservador_alerts";

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct UnitAlertsMessage<'a> {
    conservador_id: Uuid,
    alerts: &'a [Alert],
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Load environment variables from .env file if present
    dotenv().ok();

    // Initialize logging
    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME").to_string()) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e.into());
    }

    let cfg = config::Config::load()?;
    info!(
        interval_secs = cfg.alert_interval.as_secs(),
        concurrency = cfg.alert_concurrency,
        "Configuration loaded and logging initialized"
    );
    if !cfg.threshold_overrides.is_empty() {
        info!(overrides = ?cfg.threshold_overrides, "Threshold overrides active");
    }

    // Initialize database manager
    let db_manager = Arc::new(DbManager::init(&cfg).await?);
    info!("Database manager initialized");

    let evaluator = AlertEvaluator::new(Arc::clone(&db_manager))
        .with_base_overrides(cfg.threshold_overrides);
    // Reject a bad threshold configuration at startup
    evaluator.thresholds_for(&ThresholdOverrides::default()).validate()?;

    let mut publish_conn = match &cfg.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            let conn = client.get_multiplexed_async_connection().await?;
            info!("Redis publisher connected");
            Some(conn)
        }
        None => None,
    };

    let mut ticker = time::interval(cfg.alert_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if let Err(e) = run_fleet_evaluation(&evaluator, cfg.alert_concurrency, publish_conn.as_mut()).await {
            error!(error = ?e, "Fleet alert evaluation failed");
        }
    }
}

#[instrument(name = "fleet_alert_evaluation", skip_all, fields(on_close = true))]
async fn run_fleet_evaluation(
    evaluator: &AlertEvaluator<Arc<DbManager>>,
    concurrency: usize,
    publish_conn: Option<&mut MultiplexedConnection>,
) -> eyre::Result<()> {
    let evaluations = fleet::evaluate_fleet(evaluator, &ThresholdOverrides::default(), concurrency).await?;
    let summary = summarize(evaluations);

    if let Some(conn) = publish_conn {
        for (unit_id, payload) in summary.payloads {
            let published: redis::RedisResult<()> = conn.publish(ALERTS_CHANNEL, payload).await;
            if let Err(e) = published {
                warn!(error = ?e, %unit_id, "Failed to publish unit alerts");
            }
        }
    }

    info!(alert_total = summary.alert_total, failed = summary.failed, "Fleet alert evaluation completed");
    Ok(())
}

/// Per-run tally plus one serialized message per successfully evaluated unit
#[derive(Debug, Default)]
struct RunSummary {
    payloads: Vec<(Uuid, String)>,
    alert_total: usize,
    failed: usize,
}

fn summarize(evaluations: Vec<UnitEvaluation>) -> RunSummary {
    let mut summary = RunSummary::default();
    for UnitEvaluation { unit_id, result } in evaluations {
        match result {
            Ok(alerts) => {
                summary.alert_total += alerts.len();
                match serde_json::to_string(&UnitAlertsMessage { conservador_id: unit_id, alerts: &alerts }) {
                    Ok(payload) => summary.payloads.push((unit_id, payload)),
                    Err(e) => warn!(error = ?e, %unit_id, "Failed to serialize unit alerts"),
                }
            }
            Err(e) if e.is_not_found() => {
                warn!(%unit_id, "Unit disappeared before evaluation");
            }
            Err(e) => {
                summary.failed += 1;
                error!(error = ?e, %unit_id, "Error checking alerts");
            }
        }
    }
    summary
}
