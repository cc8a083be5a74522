use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::maintenance::ServiceType;
use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "estado_orden", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    Borrador,
    Pendiente,
    EnProceso,
    Completada,
    Cancelada,
    Facturada,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ServiceOrderModel {
    pub id: Uuid,
    pub numero_orden: String,
    pub conservador_id: Uuid,
    pub proveedor_id: Uuid,
    pub tipo: ServiceType,
    pub estado: OrderState,
    pub fecha_solicitud: DateTime<Utc>,
    pub fecha_programada: Option<DateTime<Utc>>,
    pub fecha_inicio: Option<DateTime<Utc>>,
    pub fecha_fin: Option<DateTime<Utc>>,
    pub descripcion_problema: Option<String>,
    pub diagnostico: Option<String>,
    pub trabajo_realizado: Option<String>,
    pub materiales_utilizados: Option<String>,
    pub costo_materiales: Option<Decimal>,
    pub costo_mano_obra: Option<Decimal>,
    pub costo_total: Option<Decimal>,
    // CFDI invoice
    pub numero_factura: Option<String>,
    pub fecha_factura: Option<DateTime<Utc>>,
    pub uuid_factura: Option<String>,
    pub pdf_factura_url: Option<String>,
    pub xml_factura_url: Option<String>,
    pub notas_internas: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewServiceOrderModel {
    pub conservador_id: Uuid,
    pub proveedor_id: Uuid,
    pub tipo: ServiceType,
    pub estado: OrderState,
    pub fecha_solicitud: Option<DateTime<Utc>>,
    pub fecha_programada: Option<DateTime<Utc>>,
    pub descripcion_problema: Option<String>,
    pub costo_materiales: Option<Decimal>,
    pub costo_mano_obra: Option<Decimal>,
    pub costo_total: Option<Decimal>,
    pub notas_internas: Option<String>,
}

impl NewServiceOrderModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_costs(self.costo_materiales, self.costo_mano_obra, self.costo_total)
    }

    /// Explicit total, or materials plus labour when either is known
    pub fn total_cost(&self) -> Option<Decimal> {
        total_cost(self.costo_materiales, self.costo_mano_obra, self.costo_total)
    }
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceOrderUpdate {
    pub tipo: Option<ServiceType>,
    pub estado: Option<OrderState>,
    pub fecha_programada: Option<DateTime<Utc>>,
    pub fecha_inicio: Option<DateTime<Utc>>,
    pub fecha_fin: Option<DateTime<Utc>>,
    pub descripcion_problema: Option<String>,
    pub diagnostico: Option<String>,
    pub trabajo_realizado: Option<String>,
    pub materiales_utilizados: Option<String>,
    pub costo_materiales: Option<Decimal>,
    pub costo_mano_obra: Option<Decimal>,
    pub costo_total: Option<Decimal>,
    pub numero_factura: Option<String>,
    pub fecha_factura: Option<DateTime<Utc>>,
    pub uuid_factura: Option<String>,
    pub pdf_factura_url: Option<String>,
    pub xml_factura_url: Option<String>,
    pub notas_internas: Option<String>,
}

impl ServiceOrderUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_costs(self.costo_materiales, self.costo_mano_obra, self.costo_total)?;
        // CFDI folio fiscal is a UUID
        if let Some(folio) = &self.uuid_factura {
            if Uuid::parse_str(folio.trim()).is_err() {
                return Err(ValidationError::new("uuid_factura", "is not a valid CFDI UUID"));
            }
        }
        if let (Some(inicio), Some(fin)) = (self.fecha_inicio, self.fecha_fin) {
            if fin < inicio {
                return Err(ValidationError::new("fecha_fin", "cannot be before fecha_inicio"));
            }
        }
        Ok(())
    }

    pub fn total_cost(&self) -> Option<Decimal> {
        total_cost(self.costo_materiales, self.costo_mano_obra, self.costo_total)
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct EvidenceModel {
    pub id: Uuid,
    pub orden_servicio_id: Uuid,
    pub tipo: String,
    pub url: String,
    pub descripcion: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvidenceModel {
    pub orden_servicio_id: Uuid,
    pub tipo: String,
    pub url: String,
    pub descripcion: Option<String>,
}

impl NewEvidenceModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::required("tipo", &self.tipo)?;
        validation::required("url", &self.url)
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SignatureModel {
    pub id: Uuid,
    pub orden_servicio_id: Uuid,
    pub nombre_firmante: String,
    pub cargo_firmante: Option<String>,
    pub firma_url: String,
    pub fecha_firma: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSignatureModel {
    pub orden_servicio_id: Uuid,
    pub nombre_firmante: String,
    pub cargo_firmante: Option<String>,
    pub firma_url: String,
    pub fecha_firma: Option<DateTime<Utc>>,
}

impl NewSignatureModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::required("nombre_firmante", &self.nombre_firmante)?;
        validation::required("firma_url", &self.firma_url)
    }
}

/// Service order with its evidence and conformity signatures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOrderDetail {
    pub order: ServiceOrderModel,
    pub evidencias: Vec<EvidenceModel>,
    pub firmas: Vec<SignatureModel>,
}

/// `OS-` + year + two-digit month, shared by every order of that month
pub fn order_number_prefix(year: i32, month: u32) -> String {
    format!("OS-{year}{month:02}")
}

/// Prefix + three-digit monthly sequence
pub fn format_order_number(year: i32, month: u32, sequence: i64) -> String {
    format!("{}{sequence:03}", order_number_prefix(year, month))
}

/// Next sequence after the highest one already issued under `prefix`.
///
/// Gaps left by deleted orders are not reused. Numbers whose suffix is not
/// numeric are ignored.
pub fn next_order_sequence<S: AsRef<str>>(prefix: &str, existing: &[S]) -> i64 {
    existing
        .iter()
        .filter_map(|numero| numero.as_ref().strip_prefix(prefix))
        .filter_map(|suffix| suffix.parse::<i64>().ok())
        .max()
        .unwrap_or(0)
        + 1
}

fn check_costs(
    materiales: Option<Decimal>,
    mano_obra: Option<Decimal>,
    total: Option<Decimal>,
) -> Result<(), ValidationError> {
    validation::optional(materiales.as_ref(), |c| validation::non_negative("costo_materiales", *c))?;
    validation::optional(mano_obra.as_ref(), |c| validation::non_negative("costo_mano_obra", *c))?;
    validation::optional(total.as_ref(), |c| validation::non_negative("costo_total", *c))
}

fn total_cost(materiales: Option<Decimal>, mano_obra: Option<Decimal>, total: Option<Decimal>) -> Option<Decimal> {
    total.or_else(|| match (materiales, mano_obra) {
        (None, None) => None,
        (m, l) => Some(m.unwrap_or_default() + l.unwrap_or_default()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::dec;

    #[test]
    fn order_numbers_are_zero_padded() {
        assert_eq!(format_order_number(2026, 3, 1), "OS-202603001");
        assert_eq!(format_order_number(2026, 11, 42), "OS-202611042");
        assert_eq!(format_order_number(2026, 1, 1234), "OS-2026011234");
    }

    #[test]
    fn sequence_follows_highest_issued_number() {
        let prefix = order_number_prefix(2026, 3);
        assert_eq!(prefix, "OS-202603");
        assert_eq!(next_order_sequence::<&str>(&prefix, &[]), 1);

        // 001 was deleted; 002 and 003 remain
        let existing = ["OS-202603002", "OS-202603003"];
        assert_eq!(next_order_sequence(&prefix, &existing), 4);

        let existing = ["OS-202603009", "OS-2026031000", "OS-202603abc"];
        assert_eq!(next_order_sequence(&prefix, &existing), 1001);
    }

    #[test]
    fn total_cost_prefers_explicit_value() {
        assert_eq!(total_cost(Some(dec!(100)), Some(dec!(250)), None), Some(dec!(350)));
        assert_eq!(total_cost(Some(dec!(100)), None, None), Some(dec!(100)));
        assert_eq!(total_cost(Some(dec!(100)), Some(dec!(250)), Some(dec!(400))), Some(dec!(400)));
        assert_eq!(total_cost(None, None, None), None);
    }

    #[test]
    fn invoice_uuid_must_parse() {
        let update = ServiceOrderUpdate { uuid_factura: Some("not-a-uuid".to_string()), ..Default::default() };
        assert_eq!(update.validate().unwrap_err().field, "uuid_factura");

        let update = ServiceOrderUpdate {
            uuid_factura: Some("6F9619FF-8B86-D011-B42D-00C04FC964FF".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn work_cannot_end_before_it_starts() {
        let inicio = Utc.with_ymd_and_hms(2026, 5, 2, 9, 0, 0).unwrap();
        let update = ServiceOrderUpdate {
            fecha_inicio: Some(inicio),
            fecha_fin: Some(inicio - chrono::Duration::hours(1)),
            ..Default::default()
        };
        assert_eq!(update.validate().unwrap_err().field, "fecha_fin");
    }
}
