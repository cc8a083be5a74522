mod common;

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use common::{InMemoryFleet, healthy_unit, weekly_sales};
use conservador_fleet::alerts::engine::AlertEvaluator;
use conservador_fleet::alerts::monitor::{AlertMonitor, AlertState};
use conservador_fleet::alerts::thresholds::ThresholdOverrides;
use conservador_fleet::alerts::types::AlertKind;

const WAIT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn first_evaluation_is_published() {
    let mut unit = healthy_unit();
    unit.productivity.occupancy_percent = 45.0;
    let fleet = Arc::new(InMemoryFleet::new());
    fleet.add_unit(unit.clone());
    fleet.add_sales(unit.id, weekly_sales(Utc::now(), 52, 60));
    let evaluator = Arc::new(AlertEvaluator::new(Arc::clone(&fleet)));

    let monitor = AlertMonitor::spawn(evaluator, unit.id, ThresholdOverrides::default(), Duration::from_secs(3600));
    let mut rx = monitor.subscribe();

    let state: AlertState = timeout(WAIT, rx.wait_for(|s| s.last_evaluated_at.is_some()))
        .await
        .expect("monitor evaluated in time")
        .expect("monitor still running")
        .clone();

    assert!(!state.is_loading);
    assert!(state.last_error.is_none());
    let kinds: Vec<AlertKind> = state.alerts.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![AlertKind::LowUsage]);
    assert_eq!(monitor.state(), state);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_alerts() {
    let mut unit = healthy_unit();
    unit.productivity.inventory_rotation = 1.0;
    let fleet = Arc::new(InMemoryFleet::new());
    fleet.add_unit(unit.clone());
    fleet.add_sales(unit.id, weekly_sales(Utc::now(), 52, 60));
    let evaluator = Arc::new(AlertEvaluator::new(Arc::clone(&fleet)));

    let monitor = AlertMonitor::spawn(evaluator, unit.id, ThresholdOverrides::default(), Duration::from_millis(50));
    let mut rx = monitor.subscribe();

    let first = timeout(WAIT, rx.wait_for(|s| s.last_evaluated_at.is_some()))
        .await
        .expect("monitor evaluated in time")
        .expect("monitor still running")
        .clone();
    assert_eq!(first.alerts.len(), 1);

    fleet.set_fail_reads(true);
    let failed = timeout(WAIT, rx.wait_for(|s| s.last_error.is_some() && !s.is_loading))
        .await
        .expect("refresh failed in time")
        .expect("monitor still running")
        .clone();

    assert_eq!(failed.alerts, first.alerts);
    assert!(failed.last_evaluated_at.is_some());

    monitor.stop();
}

#[tokio::test]
async fn unknown_unit_reports_error() {
    let fleet = Arc::new(InMemoryFleet::new());
    let evaluator = Arc::new(AlertEvaluator::new(fleet));
    let unit_id = uuid::Uuid::new_v4();

    let monitor = AlertMonitor::spawn(evaluator, unit_id, ThresholdOverrides::default(), Duration::from_secs(3600));
    let mut rx = monitor.subscribe();

    let state = timeout(WAIT, rx.wait_for(|s| !s.is_loading))
        .await
        .expect("monitor evaluated in time")
        .expect("monitor still running")
        .clone();

    assert!(state.alerts.is_empty());
    assert!(state.last_error.is_some());
    assert!(state.last_evaluated_at.is_none());
}
