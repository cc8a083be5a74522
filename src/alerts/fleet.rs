use futures::{StreamExt, stream};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{engine::AlertEvaluator, thresholds::ThresholdOverrides, types::Alert};
use crate::error::FleetError;
use crate::repository::UnitMetricsRepository;

/// Outcome of evaluating one unit during a fleet run
#[derive(Debug)]
pub struct UnitEvaluation {
    pub unit_id: Uuid,
    pub result: Result<Vec<Alert>, FleetError>,
}

/// Evaluates every unit that is not inactive, at most `concurrency` at a time.
///
/// The unit list is read from the repository on each call, so units added or
/// retired since the previous run are picked up. A failure on one unit is
/// reported in its [`UnitEvaluation`] and does not stop the others; only a
/// failure to list the units fails the run.
#[instrument(name = "evaluate_fleet", skip_all, fields(on_close = true))]
pub async fn evaluate_fleet<R: UnitMetricsRepository>(
    evaluator: &AlertEvaluator<R>,
    overrides: &ThresholdOverrides,
    concurrency: usize,
) -> Result<Vec<UnitEvaluation>, FleetError> {
    let unit_ids = evaluator.repository().list_units_to_evaluate().await?;
    info!(unit_count = unit_ids.len(), "Evaluating alerts for fleet");

    let evaluations = stream::iter(unit_ids)
        .map(|unit_id| async move { UnitEvaluation { unit_id, result: evaluator.evaluate(unit_id, overrides).await } })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;
    Ok(evaluations)
}
