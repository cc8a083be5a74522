use serde::{Deserialize, Serialize};

use super::alert_constants::*;
use crate::error::FleetError;

/// Policy parameters governing when each alert check fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    pub min_capacity_usage_percent: f64,
    pub evaluation_period_weeks: u32,
    pub min_expected_rotation: f64,
    pub downsize_threshold_percent: f64,
    pub max_maintenance_cost_ratio: f64,
    pub min_trend_decline_percent: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            min_capacity_usage_percent: DEFAULT_MIN_CAPACITY_USAGE_PERCENT,
            evaluation_period_weeks: DEFAULT_EVALUATION_PERIOD_WEEKS,
            min_expected_rotation: DEFAULT_MIN_EXPECTED_ROTATION,
            downsize_threshold_percent: DEFAULT_DOWNSIZE_THRESHOLD_PERCENT,
            max_maintenance_cost_ratio: DEFAULT_MAX_MAINTENANCE_COST_RATIO,
            min_trend_decline_percent: DEFAULT_MIN_TREND_DECLINE_PERCENT,
        }
    }
}

/// Partial set of thresholds; each present field replaces the default
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdOverrides {
    pub min_capacity_usage_percent: Option<f64>,
    pub evaluation_period_weeks: Option<u32>,
    pub min_expected_rotation: Option<f64>,
    pub downsize_threshold_percent: Option<f64>,
    pub max_maintenance_cost_ratio: Option<f64>,
    pub min_trend_decline_percent: Option<f64>,
}

impl ThresholdOverrides {
    pub fn is_empty(&self) -> bool {
        *self == ThresholdOverrides::default()
    }

    /// Layers `other` on top of `self`; fields set in `other` win
    pub fn merge(self, other: &ThresholdOverrides) -> ThresholdOverrides {
        ThresholdOverrides {
            min_capacity_usage_percent: other.min_capacity_usage_percent.or(self.min_capacity_usage_percent),
            evaluation_period_weeks: other.evaluation_period_weeks.or(self.evaluation_period_weeks),
            min_expected_rotation: other.min_expected_rotation.or(self.min_expected_rotation),
            downsize_threshold_percent: other.downsize_threshold_percent.or(self.downsize_threshold_percent),
            max_maintenance_cost_ratio: other.max_maintenance_cost_ratio.or(self.max_maintenance_cost_ratio),
            min_trend_decline_percent: other.min_trend_decline_percent.or(self.min_trend_decline_percent),
        }
    }
}

impl AlertThresholds {
    pub fn with_overrides(overrides: &ThresholdOverrides) -> Self {
        Self::default().apply(overrides)
    }

    pub fn apply(self, overrides: &ThresholdOverrides) -> Self {
        Self {
            min_capacity_usage_percent: overrides.min_capacity_usage_percent.unwrap_or(self.min_capacity_usage_percent),
            evaluation_period_weeks: overrides.evaluation_period_weeks.unwrap_or(self.evaluation_period_weeks),
            min_expected_rotation: overrides.min_expected_rotation.unwrap_or(self.min_expected_rotation),
            downsize_threshold_percent: overrides.downsize_threshold_percent.unwrap_or(self.downsize_threshold_percent),
            max_maintenance_cost_ratio: overrides.max_maintenance_cost_ratio.unwrap_or(self.max_maintenance_cost_ratio),
            min_trend_decline_percent: overrides.min_trend_decline_percent.unwrap_or(self.min_trend_decline_percent),
        }
    }

    pub fn validate(&self) -> Result<(), FleetError> {
        let mut problems = Vec::new();

        for (name, value) in [
            ("min_capacity_usage_percent", self.min_capacity_usage_percent),
            ("min_expected_rotation", self.min_expected_rotation),
            ("downsize_threshold_percent", self.downsize_threshold_percent),
            ("max_maintenance_cost_ratio", self.max_maintenance_cost_ratio),
            ("min_trend_decline_percent", self.min_trend_decline_percent),
        ] {
            if !value.is_finite() {
                problems.push(format!("{name} must be finite"));
            } else if value < 0.0 {
                problems.push(format!("{name} cannot be negative ({value})"));
            }
        }

        for (name, value) in [
            ("min_capacity_usage_percent", self.min_capacity_usage_percent),
            ("downsize_threshold_percent", self.downsize_threshold_percent),
        ] {
            if value > 100.0 {
                problems.push(format!("{name} cannot exceed 100 ({value})"));
            }
        }

        if self.evaluation_period_weeks == 0 {
            problems.push("evaluation_period_weeks must be at least 1".to_string());
        } else if self.evaluation_period_weeks > MAX_EVALUATION_PERIOD_WEEKS {
            problems.push(format!(
                "evaluation_period_weeks cannot exceed {MAX_EVALUATION_PERIOD_WEEKS} ({})",
                self.evaluation_period_weeks
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(FleetError::InvalidThresholds(problems.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_named_fields() {
        let overrides = ThresholdOverrides {
            min_capacity_usage_percent: Some(75.0),
            evaluation_period_weeks: Some(8),
            ..Default::default()
        };
        let merged = AlertThresholds::with_overrides(&overrides);
        assert_eq!(merged.min_capacity_usage_percent, 75.0);
        assert_eq!(merged.evaluation_period_weeks, 8);
        assert_eq!(merged.min_expected_rotation, 2.0);
        assert_eq!(merged.downsize_threshold_percent, 50.0);
        assert_eq!(merged.max_maintenance_cost_ratio, 0.3);
        assert_eq!(merged.min_trend_decline_percent, 15.0);
    }

    #[test]
    fn empty_overrides_keep_defaults() {
        assert!(ThresholdOverrides::default().is_empty());
        assert_eq!(AlertThresholds::with_overrides(&ThresholdOverrides::default()), AlertThresholds::default());
    }

    #[test]
    fn later_overrides_win_when_layered() {
        let base = ThresholdOverrides { min_expected_rotation: Some(3.0), min_trend_decline_percent: Some(20.0), ..Default::default() };
        let call = ThresholdOverrides { min_expected_rotation: Some(1.0), ..Default::default() };
        let merged = base.merge(&call);
        assert_eq!(merged.min_expected_rotation, Some(1.0));
        assert_eq!(merged.min_trend_decline_percent, Some(20.0));
    }

    #[test]
    fn defaults_are_valid() {
        assert!(AlertThresholds::default().validate().is_ok());
    }

    #[test]
    fn rejects_negative_and_out_of_range_values() {
        let thresholds = AlertThresholds {
            min_capacity_usage_percent: 120.0,
            evaluation_period_weeks: 0,
            max_maintenance_cost_ratio: -0.1,
            ..Default::default()
        };
        let FleetError::InvalidThresholds(msg) = thresholds.validate().unwrap_err() else {
            panic!("expected InvalidThresholds");
        };
        assert!(msg.contains("min_capacity_usage_percent cannot exceed 100"));
        assert!(msg.contains("evaluation_period_weeks"));
        assert!(msg.contains("max_maintenance_cost_ratio cannot be negative"));
    }

    #[test]
    fn rejects_window_longer_than_ten_years() {
        let at_limit = AlertThresholds { evaluation_period_weeks: MAX_EVALUATION_PERIOD_WEEKS, ..Default::default() };
        assert!(at_limit.validate().is_ok());

        let too_long = AlertThresholds { evaluation_period_weeks: 20_000_000, ..Default::default() };
        let FleetError::InvalidThresholds(msg) = too_long.validate().unwrap_err() else {
            panic!("expected InvalidThresholds");
        };
        assert!(msg.contains("evaluation_period_weeks cannot exceed 520"));
    }

    #[test]
    fn rejects_nan() {
        let thresholds = AlertThresholds { min_trend_decline_percent: f64::NAN, ..Default::default() };
        assert!(thresholds.validate().is_err());
    }
}
