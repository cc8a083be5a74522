use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "conservador_status")]
pub enum UnitStatus {
    #[sqlx(rename = "activo")]
    #[serde(rename = "activo")]
    Active,
    #[sqlx(rename = "mantenimiento")]
    #[serde(rename = "mantenimiento")]
    Maintenance,
    #[sqlx(rename = "inactivo")]
    #[serde(rename = "inactivo")]
    Inactive,
    /// Set by the alert evaluator when a downsize is recommended
    #[sqlx(rename = "revision_pendiente")]
    #[serde(rename = "revision_pendiente")]
    PendingReview,
}

impl UnitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitStatus::Active => "activo",
            UnitStatus::Maintenance => "mantenimiento",
            UnitStatus::Inactive => "inactivo",
            UnitStatus::PendingReview => "revision_pendiente",
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct UnitModel {
    pub id: Uuid,
    pub numero_serie: String,
    pub modelo: Option<String>,
    pub capacidad: Option<i32>,
    pub status: UnitStatus,
    pub cliente_id: Option<Uuid>,
    pub qr_code: Option<String>,
    pub notas: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUnitModel {
    pub numero_serie: String,
    pub modelo: Option<String>,
    pub capacidad: Option<i32>,
    pub status: UnitStatus,
    pub cliente_id: Option<Uuid>,
    pub qr_code: Option<String>,
    pub notas: Option<String>,
}

impl NewUnitModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::required("numero_serie", &self.numero_serie)?;
        if let Some(capacidad) = self.capacidad {
            if capacidad <= 0 {
                return Err(ValidationError::new("capacidad", "must be positive"));
            }
        }
        Ok(())
    }
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitUpdate {
    pub numero_serie: Option<String>,
    pub modelo: Option<String>,
    pub capacidad: Option<i32>,
    pub status: Option<UnitStatus>,
    pub cliente_id: Option<Uuid>,
    pub qr_code: Option<String>,
    pub notas: Option<String>,
}

impl UnitUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::optional(self.numero_serie.as_deref(), |v| validation::required("numero_serie", v))?;
        if matches!(self.capacidad, Some(c) if c <= 0) {
            return Err(ValidationError::new("capacidad", "must be positive"));
        }
        Ok(())
    }
}

/// Unit row joined with its productivity snapshot, if one exists
#[derive(Debug, Clone, FromRow)]
pub struct UnitSnapshotRow {
    pub id: Uuid,
    pub capacidad: Option<i32>,
    pub status: UnitStatus,
    pub ocupacion_promedio: Option<f64>,
    pub rotacion_inventario: Option<f64>,
    pub costos_mantenimiento: Option<rust_decimal::Decimal>,
    pub ingresos_generados: Option<rust_decimal::Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_serde_names() {
        assert_eq!(serde_json::to_value(UnitStatus::PendingReview).unwrap(), "revision_pendiente");
        let parsed: UnitStatus = serde_json::from_str("\"mantenimiento\"").unwrap();
        assert_eq!(parsed, UnitStatus::Maintenance);
        assert_eq!(UnitStatus::Active.to_string(), "activo");
    }

    #[test]
    fn capacity_must_be_positive() {
        let unit = NewUnitModel {
            numero_serie: "CNS-0001".to_string(),
            modelo: Some("Vertical 2 puertas".to_string()),
            capacidad: Some(0),
            status: UnitStatus::Active,
            cliente_id: None,
            qr_code: None,
            notas: None,
        };
        assert_eq!(unit.validate().unwrap_err().field, "capacidad");
        assert!(UnitUpdate { capacidad: Some(-5), ..Default::default() }.validate().is_err());
        assert!(UnitUpdate::default().validate().is_ok());
    }
}
