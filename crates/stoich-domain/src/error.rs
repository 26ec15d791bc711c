// error.rs
use thiserror::Error;

/// Error de dominio para el modelo de la tabla de reacción.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Error de validación: {0}")]
    Validation(String),

    #[error("Error de serialización: {0}")]
    Serialization(String),
}

// Conversión desde serde_json::Error (carga/volcado de snapshots).
impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Serialization(e.to_string())
    }
}
