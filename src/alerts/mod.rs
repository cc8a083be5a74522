pub mod alert_constants;
pub mod analysis;
pub mod engine;
pub mod fleet;
pub mod monitor;
pub mod thresholds;
pub mod types;
