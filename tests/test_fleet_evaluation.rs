mod common;

use chrono::Utc;
use std::sync::Arc;

use common::{InMemoryFleet, healthy_unit, weekly_sales};
use conservador_fleet::alerts::engine::AlertEvaluator;
use conservador_fleet::alerts::fleet::{UnitEvaluation, evaluate_fleet};
use conservador_fleet::alerts::thresholds::ThresholdOverrides;
use conservador_fleet::db::models::units::UnitStatus;
use uuid::Uuid;

fn evaluated_ids(evaluations: &[UnitEvaluation]) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = evaluations.iter().map(|e| e.unit_id).collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn each_run_reads_the_current_unit_list() {
    let fleet = Arc::new(InMemoryFleet::new());
    let first = healthy_unit();
    fleet.add_unit(first.clone());
    fleet.add_sales(first.id, weekly_sales(Utc::now(), 52, 60));
    let evaluator = AlertEvaluator::new(Arc::clone(&fleet));

    let run = evaluate_fleet(&evaluator, &ThresholdOverrides::default(), 4).await.unwrap();
    assert_eq!(evaluated_ids(&run), vec![first.id]);

    let added = healthy_unit();
    fleet.add_unit(added.clone());
    fleet.add_sales(added.id, weekly_sales(Utc::now(), 52, 60));

    let run = evaluate_fleet(&evaluator, &ThresholdOverrides::default(), 4).await.unwrap();
    let mut expected = vec![first.id, added.id];
    expected.sort();
    assert_eq!(evaluated_ids(&run), expected);
    assert!(run.iter().all(|e| e.result.is_ok()));
}

#[tokio::test]
async fn retired_units_are_skipped_on_the_next_run() {
    let fleet = Arc::new(InMemoryFleet::new());
    let kept = healthy_unit();
    // Would be flagged for downsizing if evaluated
    let retired = healthy_unit();
    fleet.add_unit(kept.clone());
    fleet.add_unit(retired.clone());
    fleet.add_sales(kept.id, weekly_sales(Utc::now(), 52, 60));
    fleet.add_sales(retired.id, weekly_sales(Utc::now(), 52, 10));
    fleet.set_unit_status(retired.id, UnitStatus::Inactive);
    let evaluator = AlertEvaluator::new(Arc::clone(&fleet));

    let run = evaluate_fleet(&evaluator, &ThresholdOverrides::default(), 2).await.unwrap();

    assert_eq!(evaluated_ids(&run), vec![kept.id]);
    assert!(fleet.status_updates().is_empty());
}

#[tokio::test]
async fn unit_failures_are_reported_per_unit() {
    let fleet = Arc::new(InMemoryFleet::new());
    let (a, b) = (healthy_unit(), healthy_unit());
    fleet.add_unit(a.clone());
    fleet.add_unit(b.clone());
    let evaluator = AlertEvaluator::new(Arc::clone(&fleet));
    let bad_window = ThresholdOverrides { evaluation_period_weeks: Some(0), ..Default::default() };

    let run = evaluate_fleet(&evaluator, &bad_window, 1).await.unwrap();

    let mut expected = vec![a.id, b.id];
    expected.sort();
    assert_eq!(evaluated_ids(&run), expected);
    assert!(run.iter().all(|e| e.result.as_ref().is_err_and(|err| !err.is_not_found())));
}

#[tokio::test]
async fn listing_failure_fails_the_run() {
    let fleet = Arc::new(InMemoryFleet::new());
    fleet.add_unit(healthy_unit());
    fleet.set_fail_reads(true);
    let evaluator = AlertEvaluator::new(Arc::clone(&fleet));

    let result = evaluate_fleet(&evaluator, &ThresholdOverrides::default(), 4).await;

    assert!(result.is_err());
    assert_eq!(fleet.read_count(), 1);
}
