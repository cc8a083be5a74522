use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tipo_servicio", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    MantenimientoPreventivo,
    MantenimientoCorrectivo,
    Reparacion,
    Instalacion,
    Desinstalacion,
    Otro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "maintenance_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Pendiente,
    EnProceso,
    Completado,
    Cancelado,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct MaintenanceModel {
    pub id: Uuid,
    pub conservador_id: Uuid,
    pub tipo_servicio: ServiceType,
    pub descripcion: Option<String>,
    pub fecha_programada: Option<DateTime<Utc>>,
    pub fecha_realizado: Option<DateTime<Utc>>,
    pub costo: Option<Decimal>,
    pub status: MaintenanceStatus,
    pub tecnico: Option<String>,
    pub notas: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMaintenanceModel {
    pub conservador_id: Uuid,
    pub tipo_servicio: ServiceType,
    pub descripcion: Option<String>,
    pub fecha_programada: Option<DateTime<Utc>>,
    pub fecha_realizado: Option<DateTime<Utc>>,
    pub costo: Option<Decimal>,
    pub status: MaintenanceStatus,
    pub tecnico: Option<String>,
    pub notas: Option<String>,
}

impl NewMaintenanceModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::optional(self.costo.as_ref(), |c| validation::non_negative("costo", *c))
    }
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaintenanceUpdate {
    pub tipo_servicio: Option<ServiceType>,
    pub descripcion: Option<String>,
    pub fecha_programada: Option<DateTime<Utc>>,
    pub fecha_realizado: Option<DateTime<Utc>>,
    pub costo: Option<Decimal>,
    pub status: Option<MaintenanceStatus>,
    pub tecnico: Option<String>,
    pub notas: Option<String>,
}

impl MaintenanceUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::optional(self.costo.as_ref(), |c| validation::non_negative("costo", *c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn new_maintenance() -> NewMaintenanceModel {
        NewMaintenanceModel {
            conservador_id: Uuid::nil(),
            tipo_servicio: ServiceType::MantenimientoPreventivo,
            descripcion: Some("Limpieza de condensador".to_string()),
            fecha_programada: Some(Utc::now()),
            fecha_realizado: None,
            costo: Some(dec!(450)),
            status: MaintenanceStatus::Pendiente,
            tecnico: Some("J. Ramírez".to_string()),
            notas: None,
        }
    }

    #[test]
    fn valid_record_passes() {
        assert!(new_maintenance().validate().is_ok());
    }

    #[test]
    fn negative_cost_is_rejected() {
        let mut record = new_maintenance();
        record.costo = Some(dec!(-1));
        assert_eq!(record.validate().unwrap_err().field, "costo");
    }

    #[test]
    fn service_type_uses_snake_case_names() {
        assert_eq!(serde_json::to_value(ServiceType::MantenimientoCorrectivo).unwrap(), "mantenimiento_correctivo");
        assert_eq!(serde_json::to_value(MaintenanceStatus::EnProceso).unwrap(), "en_proceso");
    }
}
