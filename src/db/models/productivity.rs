use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::models::units::UnitSnapshotRow;
use crate::error::FleetError;
use crate::repository::{ProductivitySnapshot, UnitSnapshot};
use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ProductivityModel {
    pub conservador_id: Uuid,
    pub ocupacion_promedio: f64,
    pub rotacion_inventario: f64,
    pub costos_mantenimiento: Decimal,
    pub ingresos_generados: Decimal,
    pub ventas_mensuales: Decimal,
    pub ultima_actualizacion: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProductivityModel {
    pub conservador_id: Uuid,
    pub ocupacion_promedio: f64,
    pub rotacion_inventario: f64,
    pub costos_mantenimiento: Decimal,
    pub ingresos_generados: Decimal,
    pub ventas_mensuales: Decimal,
}

impl NewProductivityModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::percentage("ocupacion_promedio", self.ocupacion_promedio)?;
        validation::non_negative_f64("rotacion_inventario", self.rotacion_inventario)?;
        validation::non_negative("costos_mantenimiento", self.costos_mantenimiento)?;
        validation::non_negative("ingresos_generados", self.ingresos_generados)?;
        validation::non_negative("ventas_mensuales", self.ventas_mensuales)?;
        Ok(())
    }
}

impl TryFrom<UnitSnapshotRow> for UnitSnapshot {
    type Error = FleetError;

    fn try_from(row: UnitSnapshotRow) -> Result<Self, Self::Error> {
        let (Some(occupancy), Some(rotation), Some(cost), Some(revenue)) = (
            row.ocupacion_promedio,
            row.rotacion_inventario,
            row.costos_mantenimiento,
            row.ingresos_generados,
        ) else {
            return Err(FleetError::MissingSnapshot(row.id));
        };

        Ok(UnitSnapshot {
            id: row.id,
            capacity: row.capacidad,
            status: row.status,
            productivity: ProductivitySnapshot {
                occupancy_percent: occupancy,
                inventory_rotation: rotation,
                maintenance_cost: cost.to_f64().unwrap_or(0.0),
                revenue: revenue.to_f64().unwrap_or(0.0),
            },
        })
    }
}
