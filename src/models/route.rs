//! Modelo de Route
//!
//! Este módulo contiene el struct Route y sus opciones candidatas.
//! Las opciones se conservan para auditoría una vez elegida una.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::segment::Segment;
use crate::models::snapshot::TrackedFields;
use crate::utils::ids::EntityId;

/// Opción candidata de ruta - inmutable una vez generada
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOption {
    pub id: EntityId,
    pub route_id: EntityId,
    /// Índice 0-based dentro de las opciones de la ruta
    pub option_index: usize,
    pub total_distance: Decimal,
    pub total_duration: Decimal,
    /// Depósitos recorridos en orden
    pub deposit_path: Vec<EntityId>,
    pub segments: Vec<Segment>,
}

impl RouteOption {
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

/// Route principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: EntityId,
    pub request_id: EntityId,
    pub created_at: DateTime<Utc>,
    pub selected_option_id: Option<EntityId>,
    /// Tramos comprometidos; vacío hasta elegir una opción
    pub segments: Vec<Segment>,
}

impl Route {
    pub fn new(id: EntityId, request_id: EntityId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            request_id,
            created_at,
            selected_option_id: None,
            segments: Vec::new(),
        }
    }

    /// Tramos ordenados por índice de orden
    pub fn segments_in_order(&self) -> Vec<&Segment> {
        let mut ordered: Vec<&Segment> = self.segments.iter().collect();
        ordered.sort_by_key(|s| s.order);
        ordered
    }
}

impl TrackedFields for Route {
    const ENTITY: &'static str = "route";

    fn field_presence(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("id", true),
            ("request_id", true),
            ("created_at", true),
            ("selected_option_id", self.selected_option_id.is_some()),
            ("segments", !self.segments.is_empty()),
        ]
    }
}

impl TrackedFields for RouteOption {
    const ENTITY: &'static str = "route_option";

    fn field_presence(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("id", true),
            ("route_id", true),
            ("option_index", true),
            ("total_distance", true),
            ("total_duration", true),
            ("deposit_path", !self.deposit_path.is_empty()),
            ("segments", !self.segments.is_empty()),
        ]
    }
}
