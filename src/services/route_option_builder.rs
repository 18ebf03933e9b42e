//! Generación de opciones tentativas de ruta
//!
//! Enumera la ruta directa y las variantes por depósitos intermedios,
//! cada una con sus tramos costeados de forma aproximada. Si la red no
//! conecta los extremos dentro del límite de paradas, se usan los caminos
//! más corto y más rápido de toda la red.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::costing::CostingConfig;
use crate::models::deposit::{DepositRegistry, LegCatalog, LegMetrics};
use crate::models::request::Request;
use crate::models::route::RouteOption;
use crate::models::segment::Segment;
use crate::services::costing_service::approximate_cost;
use crate::utils::errors::{validation_error, AppError, AppResult};
use crate::utils::ids::{EntityId, IdSequence};

/// Camino candidato entre depósitos con sus totales
#[derive(Debug, Clone)]
struct CandidatePath {
    deposits: Vec<EntityId>,
    total_distance: Decimal,
    total_duration: Decimal,
}

pub struct RouteOptionBuilder<'a> {
    config: &'a CostingConfig,
    deposits: &'a DepositRegistry,
    legs: &'a LegCatalog,
}

impl<'a> RouteOptionBuilder<'a> {
    pub fn new(config: &'a CostingConfig, deposits: &'a DepositRegistry, legs: &'a LegCatalog) -> Self {
        Self {
            config,
            deposits,
            legs,
        }
    }

    /// Depósitos más cercanos al origen y destino resueltos de la solicitud
    pub fn endpoints(&self, request: &Request) -> AppResult<(EntityId, EntityId)> {
        let origin = request.origin().ok_or_else(|| {
            AppError::UnresolvedLocation(format!("request {} has no origin coordinates", request.id))
        })?;
        let destination = request.destination().ok_or_else(|| {
            AppError::UnresolvedLocation(format!(
                "request {} has no destination coordinates",
                request.id
            ))
        })?;

        let origin_deposit = self
            .deposits
            .nearest(&origin)
            .ok_or_else(|| validation_error("deposit registry is empty"))?;
        let destination_deposit = self
            .deposits
            .nearest(&destination)
            .ok_or_else(|| validation_error("deposit registry is empty"))?;

        debug!(
            "📍 Endpoints: {} -> depósito {}, {} -> depósito {}",
            origin, origin_deposit.id, destination, destination_deposit.id
        );
        Ok((origin_deposit.id, destination_deposit.id))
    }

    /// Construir opciones para la ruta entre dos depósitos
    pub fn build(
        &self,
        route_id: EntityId,
        origin: EntityId,
        destination: EntityId,
        ids: &mut IdSequence,
    ) -> AppResult<Vec<RouteOption>> {
        if origin == destination {
            return Err(validation_error(
                "origin and destination resolve to the same deposit",
            ));
        }

        let candidates = self.select_candidates(self.enumerate_paths(origin, destination));
        if candidates.is_empty() {
            warn!("⚠️ Sin caminos entre depósitos {} y {}", origin, destination);
            return Err(AppError::NotFound(format!(
                "no path between deposits {} and {}",
                origin, destination
            )));
        }

        let options: Vec<RouteOption> = candidates
            .into_iter()
            .enumerate()
            .map(|(index, path)| self.to_option(route_id, index, path, ids))
            .collect();

        info!(
            "🗺️ {} opciones generadas para ruta {} ({} -> {})",
            options.len(),
            route_id,
            origin,
            destination
        );
        Ok(options)
    }

    /// Caminos simples con hasta `max_intermediate_stops` depósitos intermedios
    fn enumerate_paths(&self, origin: EntityId, destination: EntityId) -> Vec<CandidatePath> {
        let intermediates: Vec<EntityId> = self
            .deposits
            .ids()
            .filter(|id| *id != origin && *id != destination)
            .collect();

        let mut paths = Vec::new();
        let mut current = vec![origin];
        self.extend_paths(&mut current, destination, &intermediates, &mut paths);
        if !paths.is_empty() {
            return paths;
        }

        // Red dispersa: caminos más cortos y más rápidos sin límite de paradas
        debug!(
            "   Sin caminos con hasta {} paradas, buscando sobre toda la red",
            self.config.max_intermediate_stops
        );
        let shortest = self.lightest_path(origin, destination, |leg| leg.distance);
        let fastest = self.lightest_path(origin, destination, |leg| leg.duration);
        for deposits in shortest.into_iter().chain(fastest) {
            if paths.iter().any(|p: &CandidatePath| p.deposits == deposits) {
                continue;
            }
            if let Some(path) = self.measure(deposits) {
                paths.push(path);
            }
        }
        paths
    }

    /// Dijkstra sobre el catálogo de tramos con el peso indicado
    fn lightest_path<F>(&self, origin: EntityId, destination: EntityId, weight: F) -> Option<Vec<EntityId>>
    where
        F: Fn(&LegMetrics) -> Decimal,
    {
        let nodes: Vec<EntityId> = self.deposits.ids().collect();
        let mut best: HashMap<EntityId, Decimal> = HashMap::new();
        let mut previous: HashMap<EntityId, EntityId> = HashMap::new();
        let mut queue = BinaryHeap::new();

        best.insert(origin, Decimal::ZERO);
        queue.push(Reverse((Decimal::ZERO, origin)));

        while let Some(Reverse((cost, node))) = queue.pop() {
            if node == destination {
                break;
            }
            if best.get(&node).is_some_and(|known| cost > *known) {
                continue;
            }
            for &next in &nodes {
                if next == node {
                    continue;
                }
                let Some(leg) = self.legs.get(node, next) else {
                    continue;
                };
                let candidate = cost + weight(&leg);
                if best.get(&next).map_or(true, |known| candidate < *known) {
                    best.insert(next, candidate);
                    previous.insert(next, node);
                    queue.push(Reverse((candidate, next)));
                }
            }
        }

        if !best.contains_key(&destination) {
            return None;
        }
        let mut path = vec![destination];
        let mut node = destination;
        while node != origin {
            node = *previous.get(&node)?;
            path.push(node);
        }
        path.reverse();
        Some(path)
    }

    fn extend_paths(
        &self,
        current: &mut Vec<EntityId>,
        destination: EntityId,
        intermediates: &[EntityId],
        paths: &mut Vec<CandidatePath>,
    ) {
        let mut closing = current.clone();
        closing.push(destination);
        if let Some(path) = self.measure(closing) {
            paths.push(path);
        }

        if current.len() > self.config.max_intermediate_stops {
            return;
        }

        for &stop in intermediates {
            if current.contains(&stop) {
                continue;
            }
            let last = current[current.len() - 1];
            if self.legs.get(last, stop).is_none() {
                continue;
            }
            current.push(stop);
            self.extend_paths(current, destination, intermediates, paths);
            current.pop();
        }
    }

    fn measure(&self, deposits: Vec<EntityId>) -> Option<CandidatePath> {
        let mut total_distance = Decimal::ZERO;
        let mut total_duration = Decimal::ZERO;
        for pair in deposits.windows(2) {
            let leg = self.legs.get(pair[0], pair[1])?;
            total_distance += leg.distance;
            total_duration += leg.duration;
        }
        Some(CandidatePath {
            deposits,
            total_distance,
            total_duration,
        })
    }

    /// Ordenar por distancia y recortar, conservando siempre la más rápida
    fn select_candidates(&self, mut paths: Vec<CandidatePath>) -> Vec<CandidatePath> {
        paths.sort_by(|a, b| {
            a.total_distance
                .cmp(&b.total_distance)
                .then(a.total_duration.cmp(&b.total_duration))
                .then(a.deposits.cmp(&b.deposits))
        });

        let limit = self.config.max_route_options.max(1);
        if paths.len() <= limit {
            return paths;
        }

        let fastest = paths
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.total_duration
                    .cmp(&b.total_duration)
                    .then(a.total_distance.cmp(&b.total_distance))
            })
            .map(|(i, _)| i)
            .unwrap_or(0);

        let mut keep: Vec<usize> = (0..limit).collect();
        if fastest >= limit {
            keep[limit - 1] = fastest;
        }

        keep.into_iter().map(|i| paths[i].clone()).collect()
    }

    fn to_option(
        &self,
        route_id: EntityId,
        option_index: usize,
        path: CandidatePath,
        ids: &mut IdSequence,
    ) -> RouteOption {
        let segments: Vec<Segment> = path
            .deposits
            .windows(2)
            .enumerate()
            .filter_map(|(i, pair)| {
                let leg = self.legs.get(pair[0], pair[1])?;
                let origin = self.deposits.get(pair[0]).map(|d| d.location);
                let destination = self.deposits.get(pair[1]).map(|d| d.location);
                let mut segment = Segment {
                    id: ids.next_id(),
                    order: (i + 1) as u32,
                    origin_deposit_id: pair[0],
                    destination_deposit_id: pair[1],
                    origin_latitude: origin.map(|c| c.latitude),
                    origin_longitude: origin.map(|c| c.longitude),
                    destination_latitude: destination.map(|c| c.latitude),
                    destination_longitude: destination.map(|c| c.longitude),
                    distance: Some(leg.distance),
                    duration: Some(leg.duration),
                    carrier_plate: None,
                    approximate_cost: None,
                    real_cost: None,
                    actual_start: None,
                    actual_end: None,
                };
                segment.approximate_cost = Some(approximate_cost(&segment, self.config.base_rate_per_km));
                Some(segment)
            })
            .collect();

        debug!(
            "   Opción {}: {:?} distancia={} km duración={} h",
            option_index, path.deposits, path.total_distance, path.total_duration
        );

        RouteOption {
            id: ids.next_id(),
            route_id,
            option_index,
            total_distance: path.total_distance,
            total_duration: path.total_duration,
            deposit_path: path.deposits,
            segments,
        }
    }
}
