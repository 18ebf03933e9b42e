//! Modelo de Container
//!
//! Contenedor físico de la solicitud. Inmutable una vez creado.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::snapshot::TrackedFields;
use crate::utils::errors::AppResult;
use crate::utils::ids::EntityId;
use crate::utils::validation::validate_non_negative_decimal;

/// Container principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: EntityId,
    pub weight: Option<Decimal>,
    pub volume: Option<Decimal>,
}

/// Request para crear un contenedor
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContainerRequest {
    pub id: EntityId,

    #[validate(custom = "validate_non_negative_decimal")]
    pub weight: Option<Decimal>,

    #[validate(custom = "validate_non_negative_decimal")]
    pub volume: Option<Decimal>,
}

impl CreateContainerRequest {
    /// Validar y construir el contenedor
    pub fn into_container(self) -> AppResult<Container> {
        self.validate()?;
        Ok(Container {
            id: self.id,
            weight: self.weight,
            volume: self.volume,
        })
    }
}

impl TrackedFields for Container {
    const ENTITY: &'static str = "container";

    fn field_presence(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("id", true),
            ("weight", self.weight.is_some()),
            ("volume", self.volume.is_some()),
        ]
    }
}
