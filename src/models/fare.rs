//! Modelo de FareTable (tarifa)
//!
//! Referencia de precios compartida y de solo lectura.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::errors::{not_found_error, AppResult};
use crate::utils::ids::EntityId;

/// Tarifa
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareTable {
    pub id: EntityId,
    /// Costo fijo de gestión por tramo
    pub management_fee: Decimal,
    /// Precio por litro de combustible
    pub fuel_price: Decimal,
}

/// Catálogo de tarifas indexado por ID
#[derive(Debug, Clone, Default)]
pub struct FareCatalog {
    fares: HashMap<EntityId, FareTable>,
}

impl FareCatalog {
    pub fn new(fares: impl IntoIterator<Item = FareTable>) -> Self {
        Self {
            fares: fares.into_iter().map(|f| (f.id, f)).collect(),
        }
    }

    pub fn get(&self, id: EntityId) -> AppResult<&FareTable> {
        self.fares
            .get(&id)
            .ok_or_else(|| not_found_error("FareTable", &id.to_string()))
    }
}
