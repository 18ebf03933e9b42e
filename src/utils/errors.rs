//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del motor de costos
//! y su clasificación según la taxonomía del ciclo de vida.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::carrier::CapacityDimension;
use crate::models::lifecycle::LifecycleState;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] validator::ValidationErrors),

    #[error("Deposit identifier is not accepted as {field}: '{value}'")]
    DepositIdentifierInAddress { field: &'static str, value: String },

    #[error("Missing container: request {request_id} has no container attached")]
    MissingContainer { request_id: u64 },

    #[error("Capacity exceeded ({dimension}): container {required} > carrier max {capacity}")]
    CapacityExceeded {
        dimension: CapacityDimension,
        required: Decimal,
        capacity: Decimal,
    },

    #[error("Carrier unavailable: {0}")]
    CarrierUnavailable(String),

    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition {
        from: LifecycleState,
        to: LifecycleState,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unresolved location: {0}")]
    UnresolvedLocation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Categoría de error según la taxonomía del dominio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    CapacityExceeded,
    Lifecycle,
    NotFound,
    External,
    Internal,
}

impl AppError {
    /// Clasificar el error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_)
            | AppError::InvalidInput(_)
            | AppError::DepositIdentifierInAddress { .. }
            | AppError::MissingContainer { .. }
            | AppError::CarrierUnavailable(_)
            | AppError::UnresolvedLocation(_) => ErrorKind::Validation,
            AppError::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            AppError::InvalidTransition { .. } | AppError::Conflict(_) => ErrorKind::Lifecycle,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::ExternalApi(_) => ErrorKind::External,
            AppError::Configuration(_) | AppError::Serialization(_) | AppError::Io(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Ningún error del motor se reintenta automáticamente
    pub fn is_retryable(&self) -> bool {
        false
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación
pub fn validation_error(message: &str) -> AppError {
    AppError::Validation(message.to_string())
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} already has {} '{}'", resource, field, value))
}

/// Función helper para crear errores de configuración
pub fn configuration_error(variable: &str, value: &str) -> AppError {
    AppError::Configuration(format!("{} has an invalid value '{}'", variable, value))
}
