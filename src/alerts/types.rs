use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metric name to value, keyed with the names the dashboard expects
pub type AlertMetrics = BTreeMap<String, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    LowUsage,
    Underperforming,
    HighMaintenanceCost,
    NegativeTrend,
    ConsiderDownsize,
    SeasonalPattern,
}

impl AlertKind {
    /// Every kind, in the order alerts are emitted
    pub const ALL: [AlertKind; 6] = [
        AlertKind::LowUsage,
        AlertKind::Underperforming,
        AlertKind::HighMaintenanceCost,
        AlertKind::NegativeTrend,
        AlertKind::ConsiderDownsize,
        AlertKind::SeasonalPattern,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::LowUsage => "LOW_USAGE",
            AlertKind::Underperforming => "UNDERPERFORMING",
            AlertKind::HighMaintenanceCost => "HIGH_MAINTENANCE_COST",
            AlertKind::NegativeTrend => "NEGATIVE_TREND",
            AlertKind::ConsiderDownsize => "CONSIDER_DOWNSIZE",
            AlertKind::SeasonalPattern => "SEASONAL_PATTERN",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Advisory finding produced by one evaluation. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    pub severity: Severity,
    pub suggested_action: String,
    pub created_at: DateTime<Utc>,
    pub metrics: AlertMetrics,
}

impl Alert {
    pub fn new(
        kind: AlertKind,
        severity: Severity,
        message: impl Into<String>,
        suggested_action: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            severity,
            suggested_action: suggested_action.into(),
            created_at,
            metrics: AlertMetrics::new(),
        }
    }

    pub fn with_metric(mut self, name: &str, value: f64) -> Self {
        self.metrics.insert(name.to_string(), value);
        self
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}
