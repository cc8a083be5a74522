use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::alerts::thresholds::ThresholdOverrides;

const DEFAULT_ALERT_INTERVAL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_ALERT_CONCURRENCY: usize = 4;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub db_max_connections: u32,
    pub alert_interval: Duration,
    pub alert_concurrency: usize,
    pub threshold_overrides: ThresholdOverrides,
}

impl Config {
    /// Loads configuration from `.env` and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let redis_url = lookup("REDIS_URL").filter(|url| !url.trim().is_empty());

        let alert_interval_secs: u64 = parse_or(&lookup, "ALERT_INTERVAL_SECS", DEFAULT_ALERT_INTERVAL_SECS)?;
        if alert_interval_secs == 0 {
            return Err(ConfigError::Invalid { key: "ALERT_INTERVAL_SECS", value: "0".to_string() });
        }

        let alert_concurrency: usize = parse_or(&lookup, "ALERT_CONCURRENCY", DEFAULT_ALERT_CONCURRENCY)?;
        let db_max_connections: u32 = parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;

        let threshold_overrides = ThresholdOverrides {
            min_capacity_usage_percent: parse_opt(&lookup, "ALERT_MIN_CAPACITY_USAGE_PERCENT")?,
            evaluation_period_weeks: parse_opt(&lookup, "ALERT_EVALUATION_PERIOD_WEEKS")?,
            min_expected_rotation: parse_opt(&lookup, "ALERT_MIN_EXPECTED_ROTATION")?,
            downsize_threshold_percent: parse_opt(&lookup, "ALERT_DOWNSIZE_THRESHOLD_PERCENT")?,
            max_maintenance_cost_ratio: parse_opt(&lookup, "ALERT_MAX_MAINTENANCE_COST_RATIO")?,
            min_trend_decline_percent: parse_opt(&lookup, "ALERT_MIN_TREND_DECLINE_PERCENT")?,
        };

        Ok(Config {
            database_url,
            redis_url,
            db_max_connections,
            alert_interval: Duration::from_secs(alert_interval_secs),
            alert_concurrency: alert_concurrency.max(1),
            threshold_overrides,
        })
    }
}

fn parse_opt<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        _ => Ok(None),
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    Ok(parse_opt(lookup, key)?.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let cfg = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/fleet")])).unwrap();
        assert_eq!(cfg.alert_interval, Duration::from_secs(86_400));
        assert_eq!(cfg.alert_concurrency, 4);
        assert_eq!(cfg.db_max_connections, 5);
        assert!(cfg.redis_url.is_none());
        assert_eq!(cfg.threshold_overrides, ThresholdOverrides::default());
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn threshold_overrides_are_read_from_env() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/fleet"),
            ("ALERT_MIN_CAPACITY_USAGE_PERCENT", "70"),
            ("ALERT_EVALUATION_PERIOD_WEEKS", "6"),
        ]))
        .unwrap();
        assert_eq!(cfg.threshold_overrides.min_capacity_usage_percent, Some(70.0));
        assert_eq!(cfg.threshold_overrides.evaluation_period_weeks, Some(6));
        assert_eq!(cfg.threshold_overrides.max_maintenance_cost_ratio, None);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/fleet"),
            ("ALERT_MAX_MAINTENANCE_COST_RATIO", "thirty percent"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "ALERT_MAX_MAINTENANCE_COST_RATIO", .. }));
    }
}
