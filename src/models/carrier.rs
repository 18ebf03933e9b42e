//! Modelo de Carrier (camión)
//!
//! Datos de referencia inmutables durante un envío.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::snapshot::TrackedFields;
use crate::utils::ids::EntityId;

/// Dimensión de capacidad validada al asignar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapacityDimension {
    Weight,
    Volume,
}

impl std::fmt::Display for CapacityDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapacityDimension::Weight => write!(f, "weight"),
            CapacityDimension::Volume => write!(f, "volume"),
        }
    }
}

/// Carrier principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Carrier {
    pub id: EntityId,
    pub license_plate: String,
    pub max_weight: Option<Decimal>,
    pub max_volume: Option<Decimal>,
    pub cost_per_km: Option<Decimal>,
    /// Litros por km
    pub avg_fuel_consumption: Option<Decimal>,
    pub available: bool,
    pub active: bool,
}

impl Carrier {
    pub fn is_assignable(&self) -> bool {
        self.available && self.active
    }
}

impl TrackedFields for Carrier {
    const ENTITY: &'static str = "carrier";

    fn field_presence(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("id", true),
            ("license_plate", !self.license_plate.is_empty()),
            ("max_weight", self.max_weight.is_some()),
            ("max_volume", self.max_volume.is_some()),
            ("cost_per_km", self.cost_per_km.is_some()),
            ("avg_fuel_consumption", self.avg_fuel_consumption.is_some()),
            ("available", true),
            ("active", true),
        ]
    }
}
