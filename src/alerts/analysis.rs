use chrono::{DateTime, Datelike, Duration, Utc};

use super::alert_constants::{MIN_REVENUE_DIVISOR, MONTHS_PER_YEAR};
use crate::repository::SaleRecord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSummary {
    pub earlier_avg: f64,
    pub later_avg: f64,
    pub decline_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalSummary {
    pub variation: f64,
    pub annual_avg: f64,
}

/// Maintenance cost as a fraction of revenue, with revenue floored at 1
pub fn maintenance_cost_ratio(cost: f64, revenue: f64) -> f64 {
    cost / revenue.max(MIN_REVENUE_DIVISOR)
}

/// Sums quantities into `weeks` buckets; index 0 is the week ending at `now`
pub fn weekly_buckets(sales: &[SaleRecord], now: DateTime<Utc>, weeks: u32) -> Vec<f64> {
    let mut buckets = vec![0.0; weeks as usize];
    let week = Duration::weeks(1).num_milliseconds();

    for sale in sales {
        let elapsed = (now - sale.fecha).num_milliseconds();
        if elapsed < 0 {
            continue;
        }
        let index = (elapsed / week) as usize;
        if let Some(bucket) = buckets.get_mut(index) {
            *bucket += f64::from(sale.cantidad);
        }
    }
    buckets
}

/// Compares the older half of the window against the newer half.
///
/// `buckets` is indexed by elapsed weeks, so it is reversed into chronological
/// order before splitting at `len / 2`. Returns `None` when either half is
/// empty or the older half averaged zero sales.
pub fn trend_decline(buckets: &[f64]) -> Option<TrendSummary> {
    let chronological: Vec<f64> = buckets.iter().rev().copied().collect();
    let (earlier, later) = chronological.split_at(chronological.len() / 2);

    let earlier_avg = mean(earlier)?;
    let later_avg = mean(later)?;
    if earlier_avg == 0.0 {
        return None;
    }

    Some(TrendSummary {
        earlier_avg,
        later_avg,
        decline_percent: (earlier_avg - later_avg) / earlier_avg * 100.0,
    })
}

/// Mean of per-sale quantity as a percentage of unit capacity
pub fn average_capacity_usage(sales: &[SaleRecord], capacity: Option<i32>) -> Option<f64> {
    let capacity = f64::from(capacity.filter(|c| *c > 0)?);
    let usages: Vec<f64> = sales
        .iter()
        .map(|sale| f64::from(sale.cantidad) / capacity * 100.0)
        .collect();
    mean(&usages)
}

/// Totals per calendar month (0 = January), regardless of year
pub fn monthly_totals(sales: &[SaleRecord]) -> [f64; MONTHS_PER_YEAR] {
    let mut totals = [0.0; MONTHS_PER_YEAR];
    for sale in sales {
        totals[sale.fecha.month0() as usize] += f64::from(sale.cantidad);
    }
    totals
}

/// Ratio of the busiest month to the annual monthly average
pub fn seasonal_variation(totals: &[f64; MONTHS_PER_YEAR]) -> Option<SeasonalSummary> {
    let annual_avg = totals.iter().sum::<f64>() / MONTHS_PER_YEAR as f64;
    if annual_avg <= 0.0 {
        return None;
    }
    let peak = totals.iter().copied().fold(f64::MIN, f64::max);
    Some(SeasonalSummary {
        variation: peak / annual_avg,
        annual_avg,
    })
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
