// --- SEASONALITY CONSTANTS ---
/// Peak month must exceed the annual monthly average by this factor
pub const SEASONAL_VARIATION_TRIGGER: f64 = 1.5;
/// Calendar months bucketed by the seasonality check
pub const MONTHS_PER_YEAR: usize = 12;
/// Months of sales history fetched for the seasonality check
pub const SEASONAL_LOOKBACK_MONTHS: u32 = 12;

// --- COST CONSTANTS ---
/// Revenue floor used as the divisor of the maintenance cost ratio
pub const MIN_REVENUE_DIVISOR: f64 = 1.0;

// --- DEFAULT THRESHOLDS ---
pub const DEFAULT_MIN_CAPACITY_USAGE_PERCENT: f64 = 60.0;
pub const DEFAULT_EVALUATION_PERIOD_WEEKS: u32 = 4;
/// Longest accepted evaluation window (ten years)
pub const MAX_EVALUATION_PERIOD_WEEKS: u32 = 520;
pub const DEFAULT_MIN_EXPECTED_ROTATION: f64 = 2.0; // per month
pub const DEFAULT_DOWNSIZE_THRESHOLD_PERCENT: f64 = 50.0;
pub const DEFAULT_MAX_MAINTENANCE_COST_RATIO: f64 = 0.3; // 30% of revenue
pub const DEFAULT_MIN_TREND_DECLINE_PERCENT: f64 = 15.0;
