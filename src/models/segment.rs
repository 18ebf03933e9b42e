//! Modelo de Segment (tramo)
//!
//! Un tramo une dos depósitos consecutivos de la ruta. Se crea al generar
//! una opción y se completa a medida que avanza la ejecución.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::snapshot::TrackedFields;
use crate::utils::ids::EntityId;

/// Segment principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: EntityId,
    /// Orden 1-based dentro de la ruta
    pub order: u32,
    pub origin_deposit_id: EntityId,
    pub destination_deposit_id: EntityId,
    pub origin_latitude: Option<Decimal>,
    pub origin_longitude: Option<Decimal>,
    pub destination_latitude: Option<Decimal>,
    pub destination_longitude: Option<Decimal>,
    /// Kilómetros
    pub distance: Option<Decimal>,
    /// Horas
    pub duration: Option<Decimal>,
    pub carrier_plate: Option<String>,
    pub approximate_cost: Option<Decimal>,
    pub real_cost: Option<Decimal>,
    pub actual_start: Option<DateTime<Utc>>,
    pub actual_end: Option<DateTime<Utc>>,
}

impl Segment {
    /// Copia independiente con identificador nuevo y campos de ejecución vacíos
    pub fn committed_copy(&self, id: EntityId) -> Self {
        Self {
            id,
            carrier_plate: None,
            real_cost: None,
            actual_start: None,
            actual_end: None,
            ..self.clone()
        }
    }

    pub fn distance_or_zero(&self) -> Decimal {
        self.distance.unwrap_or(Decimal::ZERO)
    }

    pub fn duration_or_zero(&self) -> Decimal {
        self.duration.unwrap_or(Decimal::ZERO)
    }
}

impl TrackedFields for Segment {
    const ENTITY: &'static str = "segment";

    fn field_presence(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("id", true),
            ("order", true),
            ("origin_deposit_id", true),
            ("destination_deposit_id", true),
            ("origin_latitude", self.origin_latitude.is_some()),
            ("origin_longitude", self.origin_longitude.is_some()),
            ("destination_latitude", self.destination_latitude.is_some()),
            ("destination_longitude", self.destination_longitude.is_some()),
            ("distance", self.distance.is_some()),
            ("duration", self.duration.is_some()),
            ("carrier_plate", self.carrier_plate.is_some()),
            ("approximate_cost", self.approximate_cost.is_some()),
            ("real_cost", self.real_cost.is_some()),
            ("actual_start", self.actual_start.is_some()),
            ("actual_end", self.actual_end.is_some()),
        ]
    }
}
