use thiserror::Error;
use uuid::Uuid;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("conservador {0} has no productivity snapshot")]
    MissingSnapshot(Uuid),

    #[error("invalid alert thresholds: {0}")]
    InvalidThresholds(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FleetError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        FleetError::NotFound { entity, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FleetError::NotFound { .. })
    }
}

pub type Result<T, E = FleetError> = std::result::Result<T, E>;
