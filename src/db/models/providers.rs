use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ProviderModel {
    pub id: Uuid,
    pub razon_social: String,
    pub rfc: String,
    pub regimen_fiscal: String,
    pub direccion_fiscal: String,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub contacto_nombre: Option<String>,
    pub notas: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProviderModel {
    pub razon_social: String,
    pub rfc: String,
    pub regimen_fiscal: String,
    pub direccion_fiscal: String,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub contacto_nombre: Option<String>,
    pub notas: Option<String>,
}

impl NewProviderModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::required("razon_social", &self.razon_social)?;
        validation::rfc("rfc", &self.rfc)?;
        validation::required("regimen_fiscal", &self.regimen_fiscal)?;
        validation::required("direccion_fiscal", &self.direccion_fiscal)?;
        validation::optional(self.telefono.as_deref(), |v| validation::phone("telefono", v))?;
        validation::optional(self.email.as_deref(), |v| validation::email("email", v))?;
        Ok(())
    }
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderUpdate {
    pub razon_social: Option<String>,
    pub rfc: Option<String>,
    pub regimen_fiscal: Option<String>,
    pub direccion_fiscal: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub contacto_nombre: Option<String>,
    pub notas: Option<String>,
}

impl ProviderUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::optional(self.razon_social.as_deref(), |v| validation::required("razon_social", v))?;
        validation::optional(self.rfc.as_deref(), |v| validation::rfc("rfc", v))?;
        validation::optional(self.telefono.as_deref(), |v| validation::phone("telefono", v))?;
        validation::optional(self.email.as_deref(), |v| validation::email("email", v))?;
        Ok(())
    }
}
