use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};
use uuid::Uuid;

use super::engine::AlertEvaluator;
use super::thresholds::ThresholdOverrides;
use super::types::Alert;
use crate::repository::UnitMetricsRepository;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Latest known alerts for a monitored unit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertState {
    pub alerts: Vec<Alert>,
    pub is_loading: bool,
    pub last_error: Option<String>,
    pub last_evaluated_at: Option<DateTime<Utc>>,
}

/// Re-evaluates one unit on a fixed cadence and publishes the result.
///
/// The first evaluation runs immediately. A failed evaluation keeps the
/// previous alerts and records the error. Dropping the monitor stops it.
pub struct AlertMonitor {
    state: watch::Receiver<AlertState>,
    task: JoinHandle<()>,
}

impl AlertMonitor {
    pub fn spawn<R>(
        evaluator: Arc<AlertEvaluator<R>>,
        unit_id: Uuid,
        overrides: ThresholdOverrides,
        refresh_every: Duration,
    ) -> Self
    where
        R: UnitMetricsRepository + 'static,
    {
        let (tx, rx) = watch::channel(AlertState { is_loading: true, ..AlertState::default() });

        let task = tokio::spawn(async move {
            let mut ticker = interval(refresh_every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                tx.send_modify(|state| state.is_loading = true);

                let result = evaluator.evaluate(unit_id, &overrides).await;
                tx.send_modify(|state| {
                    state.is_loading = false;
                    match result {
                        Ok(alerts) => {
                            state.alerts = alerts;
                            state.last_error = None;
                            state.last_evaluated_at = Some(Utc::now());
                        }
                        Err(e) => {
                            error!(err = ?e, %unit_id, "Error checking alerts");
                            state.last_error = Some(e.to_string());
                        }
                    }
                });

                if tx.is_closed() {
                    info!(%unit_id, "Alert monitor has no subscribers, stopping");
                    break;
                }
            }
        });

        Self { state: rx, task }
    }

    pub fn state(&self) -> AlertState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AlertState> {
        self.state.clone()
    }

    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for AlertMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}
