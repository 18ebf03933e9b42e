//! Modelo de Deposit y red de tramos entre depósitos
//!
//! El registro de depósitos responde la tarifa de estadía nocturna;
//! el catálogo de tramos provee distancia y duración entre pares.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::location::Coordinates;
use crate::utils::ids::EntityId;

/// Depósito intermedio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    pub id: EntityId,
    pub name: String,
    pub location: Coordinates,
    /// Costo de estadía por noche, si el depósito lo cobra
    pub nightly_fee: Option<Decimal>,
}

/// Registro de depósitos
#[derive(Debug, Clone, Default)]
pub struct DepositRegistry {
    deposits: BTreeMap<EntityId, Deposit>,
}

impl DepositRegistry {
    pub fn new(deposits: impl IntoIterator<Item = Deposit>) -> Self {
        Self {
            deposits: deposits.into_iter().map(|d| (d.id, d)).collect(),
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Deposit> {
        self.deposits.get(&id)
    }

    pub fn nightly_fee(&self, id: EntityId) -> Option<Decimal> {
        self.deposits.get(&id).and_then(|d| d.nightly_fee)
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.deposits.keys().copied()
    }

    /// Depósito más cercano a unas coordenadas; empates por menor ID
    pub fn nearest(&self, point: &Coordinates) -> Option<&Deposit> {
        self.deposits
            .values()
            .min_by_key(|d| d.location.squared_degree_distance(point))
    }
}

/// Métricas de un tramo entre dos depósitos
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegMetrics {
    /// Kilómetros
    pub distance: Decimal,
    /// Horas
    pub duration: Decimal,
}

/// Catálogo no dirigido de tramos disponibles
#[derive(Debug, Clone, Default)]
pub struct LegCatalog {
    legs: HashMap<(EntityId, EntityId), LegMetrics>,
}

impl LegCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_leg(mut self, from: EntityId, to: EntityId, distance: Decimal, duration: Decimal) -> Self {
        self.insert(from, to, LegMetrics { distance, duration });
        self
    }

    pub fn insert(&mut self, from: EntityId, to: EntityId, metrics: LegMetrics) {
        self.legs.insert(Self::key(from, to), metrics);
    }

    pub fn get(&self, from: EntityId, to: EntityId) -> Option<LegMetrics> {
        self.legs.get(&Self::key(from, to)).copied()
    }

    fn key(a: EntityId, b: EntityId) -> (EntityId, EntityId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}
