use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ClientModel {
    pub id: Uuid,
    pub nombre: String,
    pub rfc: Option<String>,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewClientModel {
    pub nombre: String,
    pub rfc: Option<String>,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
}

impl NewClientModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::required("nombre", &self.nombre)?;
        validation::optional(self.rfc.as_deref(), |v| validation::rfc("rfc", v))?;
        validation::optional(self.telefono.as_deref(), |v| validation::phone("telefono", v))?;
        validation::optional(self.email.as_deref(), |v| validation::email("email", v))?;
        Ok(())
    }
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientUpdate {
    pub nombre: Option<String>,
    pub rfc: Option<String>,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
}

impl ClientUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::optional(self.nombre.as_deref(), |v| validation::required("nombre", v))?;
        validation::optional(self.rfc.as_deref(), |v| validation::rfc("rfc", v))?;
        validation::optional(self.telefono.as_deref(), |v| validation::phone("telefono", v))?;
        validation::optional(self.email.as_deref(), |v| validation::email("email", v))?;
        Ok(())
    }
}
