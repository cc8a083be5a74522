use chrono::{DateTime, Duration, Months, Utc};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{
    alert_constants::{SEASONAL_LOOKBACK_MONTHS, SEASONAL_VARIATION_TRIGGER},
    analysis,
    thresholds::{AlertThresholds, ThresholdOverrides},
    types::{Alert, AlertKind, Severity},
};
use crate::db::models::units::UnitStatus;
use crate::error::FleetError;
use crate::repository::{SaleRecord, UnitMetricsRepository, UnitSnapshot, UnitStatusUpdate};

/// Result of scoring one unit, before any write is performed
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEvaluation {
    pub alerts: Vec<Alert>,
    /// Status change requested by the downsize check
    pub status_update: Option<UnitStatusUpdate>,
}

/// Scores units against alert thresholds using a [`UnitMetricsRepository`]
pub struct AlertEvaluator<R> {
    repository: R,
    base_overrides: ThresholdOverrides,
}

impl<R: UnitMetricsRepository> AlertEvaluator<R> {
    pub fn new(repository: R) -> Self {
        Self { repository, base_overrides: ThresholdOverrides::default() }
    }

    /// Overrides applied to every evaluation, beneath per-call overrides
    pub fn with_base_overrides(mut self, overrides: ThresholdOverrides) -> Self {
        self.base_overrides = overrides;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn thresholds_for(&self, overrides: &ThresholdOverrides) -> AlertThresholds {
        AlertThresholds::with_overrides(&self.base_overrides.merge(overrides))
    }

    pub async fn evaluate(&self, unit_id: Uuid, overrides: &ThresholdOverrides) -> Result<Vec<Alert>, FleetError> {
        self.evaluate_at(unit_id, overrides, Utc::now()).await
    }

    /// Evaluates `unit_id` as of `now`.
    ///
    /// Any fetch or write failure aborts the whole evaluation. When the
    /// downsize check fires the unit is moved to `revision_pendiente` before
    /// the alerts are returned.
    #[instrument(name = "evaluate_unit_alerts", skip(self, overrides, now), fields(on_close = true, unit_id = %unit_id))]
    pub async fn evaluate_at(
        &self,
        unit_id: Uuid,
        overrides: &ThresholdOverrides,
        now: DateTime<Utc>,
    ) -> Result<Vec<Alert>, FleetError> {
        let thresholds = self.thresholds_for(overrides);
        thresholds.validate()?;

        let window_start = now
            .checked_sub_signed(Duration::weeks(i64::from(thresholds.evaluation_period_weeks)))
            .ok_or_else(|| {
                FleetError::InvalidThresholds(format!(
                    "evaluation window of {} weeks reaches before the earliest representable date",
                    thresholds.evaluation_period_weeks
                ))
            })?;
        let annual_start = now
            .checked_sub_months(Months::new(SEASONAL_LOOKBACK_MONTHS))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let (unit, recent_sales, annual_sales) = tokio::try_join!(
            self.repository.get_unit_snapshot(unit_id),
            self.repository.get_sales_since(unit_id, window_start),
            self.repository.get_sales_since(unit_id, annual_start),
        )?;
        debug!(
            recent_sales = recent_sales.len(),
            annual_sales = annual_sales.len(),
            status = %unit.status,
            "Fetched unit snapshot and sales history"
        );

        let evaluation = compute_alerts(&unit, &recent_sales, &annual_sales, &thresholds, now);

        if let Some(update) = &evaluation.status_update {
            self.repository.update_unit_status(unit_id, update).await?;
            info!(status = %update.status, note = %update.note, "Unit flagged for capacity review");
        }

        info!(
            alert_count = evaluation.alerts.len(),
            kinds = ?evaluation.alerts.iter().map(|a| a.kind).collect::<Vec<_>>(),
            "Alert evaluation completed"
        );
        Ok(evaluation.alerts)
    }
}

/// Runs every check against already-fetched data. Pure; performs no I/O.
pub fn compute_alerts(
    unit: &UnitSnapshot,
    recent_sales: &[SaleRecord],
    annual_sales: &[SaleRecord],
    thresholds: &AlertThresholds,
    now: DateTime<Utc>,
) -> AlertEvaluation {
    let productivity = &unit.productivity;
    let mut alerts = Vec::new();
    let mut status_update = None;

    // Capacity usage
    if productivity.occupancy_percent < thresholds.min_capacity_usage_percent {
        alerts.push(
            Alert::new(
                AlertKind::LowUsage,
                Severity::Medium,
                format!("Uso de capacidad bajo ({}%)", productivity.occupancy_percent),
                "Revisar estrategia de ventas o considerar reubicación",
                now,
            )
            .with_metric("ocupacion", productivity.occupancy_percent),
        );
    }

    // Inventory rotation
    if productivity.inventory_rotation < thresholds.min_expected_rotation {
        alerts.push(
            Alert::new(
                AlertKind::Underperforming,
                Severity::High,
                "Baja rotación de inventario",
                "Evaluar estrategia comercial o considerar reubicación",
                now,
            )
            .with_metric("rotacion", productivity.inventory_rotation),
        );
    }

    // Maintenance cost vs revenue
    let cost_ratio = analysis::maintenance_cost_ratio(productivity.maintenance_cost, productivity.revenue);
    if cost_ratio > thresholds.max_maintenance_cost_ratio {
        alerts.push(
            Alert::new(
                AlertKind::HighMaintenanceCost,
                Severity::High,
                format!("Costos de mantenimiento elevados ({:.1}% de ingresos)", cost_ratio * 100.0),
                "Evaluar estado del equipo y considerar reemplazo",
                now,
            )
            .with_metric("costoRatio", cost_ratio)
            .with_metric("costosMensuales", productivity.maintenance_cost),
        );
    }

    // Sales trend over the evaluation window
    let buckets = analysis::weekly_buckets(recent_sales, now, thresholds.evaluation_period_weeks);
    match analysis::trend_decline(&buckets) {
        Some(trend) if trend.decline_percent > thresholds.min_trend_decline_percent => {
            alerts.push(
                Alert::new(
                    AlertKind::NegativeTrend,
                    Severity::High,
                    format!("Tendencia negativa en ventas ({:.1}% de decline)", trend.decline_percent),
                    "Investigar causas de la disminución en ventas",
                    now,
                )
                .with_metric("declinePorcentaje", trend.decline_percent)
                .with_metric("ventasIniciales", trend.earlier_avg)
                .with_metric("ventasFinales", trend.later_avg),
            );
        }
        Some(_) => {}
        None => debug!(?buckets, "Trend check skipped: no baseline sales"),
    }

    // Downsize recommendation
    match analysis::average_capacity_usage(recent_sales, unit.capacity) {
        Some(avg_usage) if avg_usage < thresholds.downsize_threshold_percent => {
            alerts.push(
                Alert::new(
                    AlertKind::ConsiderDownsize,
                    Severity::High,
                    format!("Uso promedio de capacidad muy bajo ({avg_usage:.1}%)"),
                    "Considerar cambio a un conservador de menor capacidad",
                    now,
                )
                .with_metric("promedioUso", avg_usage)
                .with_metric("capacidadActual", f64::from(unit.capacity.unwrap_or_default())),
            );
            status_update = Some(UnitStatusUpdate {
                status: UnitStatus::PendingReview,
                note: format!("Revisión de capacidad requerida - Uso promedio: {avg_usage:.1}%"),
            });
        }
        Some(_) => {}
        None => debug!(capacity = ?unit.capacity, "Downsize check skipped: no sales or capacity"),
    }

    // Seasonality over the last year
    let monthly = analysis::monthly_totals(annual_sales);
    if let Some(seasonal) = analysis::seasonal_variation(&monthly) {
        if seasonal.variation > SEASONAL_VARIATION_TRIGGER {
            alerts.push(
                Alert::new(
                    AlertKind::SeasonalPattern,
                    Severity::Medium,
                    "Se detectó un patrón estacional significativo",
                    "Planificar estrategia según temporada",
                    now,
                )
                .with_metric("variacionEstacional", seasonal.variation)
                .with_metric("promedioAnual", seasonal.annual_avg),
            );
        }
    }

    AlertEvaluation { alerts, status_update }
}
