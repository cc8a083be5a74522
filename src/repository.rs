use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::models::units::UnitStatus;
use crate::error::FleetError;

/// Productivity figures attached to a unit, as plain floats for scoring
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProductivitySnapshot {
    pub occupancy_percent: f64,
    pub inventory_rotation: f64,
    pub maintenance_cost: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitSnapshot {
    pub id: Uuid,
    pub capacity: Option<i32>,
    pub status: UnitStatus,
    pub productivity: ProductivitySnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaleRecord {
    pub fecha: DateTime<Utc>,
    pub cantidad: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitStatusUpdate {
    pub status: UnitStatus,
    pub note: String,
}

/// Reads and writes the alert evaluator needs from the backing store
#[async_trait]
pub trait UnitMetricsRepository: Send + Sync {
    /// Fails with [`FleetError::NotFound`] when the unit does not exist
    async fn get_unit_snapshot(&self, unit_id: Uuid) -> Result<UnitSnapshot, FleetError>;

    /// Sales with `fecha >= since`, newest first
    async fn get_sales_since(&self, unit_id: Uuid, since: DateTime<Utc>) -> Result<Vec<SaleRecord>, FleetError>;

    async fn update_unit_status(&self, unit_id: Uuid, update: &UnitStatusUpdate) -> Result<(), FleetError>;

    /// Ids of every unit whose status is not `inactivo`, as currently stored
    async fn list_units_to_evaluate(&self) -> Result<Vec<Uuid>, FleetError>;
}

#[async_trait]
impl<T> UnitMetricsRepository for Arc<T>
where
    T: UnitMetricsRepository + ?Sized,
{
    async fn get_unit_snapshot(&self, unit_id: Uuid) -> Result<UnitSnapshot, FleetError> {
        (**self).get_unit_snapshot(unit_id).await
    }

    async fn get_sales_since(&self, unit_id: Uuid, since: DateTime<Utc>) -> Result<Vec<SaleRecord>, FleetError> {
        (**self).get_sales_since(unit_id, since).await
    }

    async fn update_unit_status(&self, unit_id: Uuid, update: &UnitStatusUpdate) -> Result<(), FleetError> {
        (**self).update_unit_status(unit_id, update).await
    }

    async fn list_units_to_evaluate(&self) -> Result<Vec<Uuid>, FleetError> {
        (**self).list_units_to_evaluate().await
    }
}
