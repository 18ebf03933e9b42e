//! Auditoría de completitud
//!
//! Reporta, por tipo de entidad, los campos que nunca se poblaron en
//! ningún snapshot del historial. Es un diagnóstico, no una validación.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::models::carrier::Carrier;
use crate::models::container::Container;
use crate::models::request::Request;
use crate::models::route::{Route, RouteOption};
use crate::models::segment::Segment;
use crate::models::snapshot::{LifecycleSnapshot, TrackedFields};

/// Campos nunca poblados por entidad
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompletenessReport {
    pub never_populated: BTreeMap<&'static str, BTreeSet<&'static str>>,
}

impl CompletenessReport {
    pub fn fields_for(&self, entity: &str) -> Vec<&'static str> {
        self.never_populated
            .get(entity)
            .map(|fields| fields.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_complete(&self) -> bool {
        self.never_populated.values().all(|fields| fields.is_empty())
    }
}

/// Acumulador por tipo de entidad
#[derive(Default)]
struct FieldTally {
    known: BTreeSet<&'static str>,
    populated: BTreeSet<&'static str>,
}

impl FieldTally {
    fn observe<T: TrackedFields>(&mut self, entity: &T) {
        for (name, present) in entity.field_presence() {
            self.known.insert(name);
            if present {
                self.populated.insert(name);
            }
        }
    }

    fn never_populated(&self) -> BTreeSet<&'static str> {
        self.known.difference(&self.populated).copied().collect()
    }
}

/// Inspeccionar el historial completo de snapshots
pub fn audit(snapshots: &[LifecycleSnapshot]) -> CompletenessReport {
    let mut tallies: BTreeMap<&'static str, FieldTally> = BTreeMap::new();
    for entity in [
        Request::ENTITY,
        Container::ENTITY,
        Route::ENTITY,
        RouteOption::ENTITY,
        Segment::ENTITY,
        Carrier::ENTITY,
    ] {
        tallies.insert(entity, FieldTally::default());
    }

    for snapshot in snapshots {
        if let Some(request) = &snapshot.request {
            observe(&mut tallies, request);
            if let Some(container) = &request.container {
                observe(&mut tallies, container);
            }
        }
        if let Some(route) = &snapshot.route {
            observe(&mut tallies, route);
            for segment in &route.segments {
                observe(&mut tallies, segment);
            }
        }
        if let Some(options) = &snapshot.route_options {
            for option in options {
                observe(&mut tallies, option);
            }
        }
        if let Some(carrier) = &snapshot.carrier {
            observe(&mut tallies, carrier);
        }
    }

    let never_populated = tallies
        .into_iter()
        .map(|(entity, tally)| (entity, tally.never_populated()))
        .collect();

    CompletenessReport { never_populated }
}

fn observe<T: TrackedFields>(tallies: &mut BTreeMap<&'static str, FieldTally>, entity: &T) {
    tallies.entry(T::ENTITY).or_default().observe(entity);
}
