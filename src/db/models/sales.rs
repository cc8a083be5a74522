use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::repository::SaleRecord;
use crate::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SaleModel {
    pub id: Uuid,
    pub conservador_id: Uuid,
    pub fecha: DateTime<Utc>,
    pub cantidad: i32,
    pub created_at: DateTime<Utc>,
}

impl From<SaleModel> for SaleRecord {
    fn from(model: SaleModel) -> Self {
        SaleRecord { fecha: model.fecha, cantidad: model.cantidad }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSaleModel {
    pub conservador_id: Uuid,
    pub fecha: DateTime<Utc>,
    pub cantidad: i32,
}

impl NewSaleModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.cantidad < 0 {
            return Err(ValidationError::new("cantidad", "cannot be negative"));
        }
        Ok(())
    }
}
