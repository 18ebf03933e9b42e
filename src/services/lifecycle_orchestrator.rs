//! Orquestador del ciclo de vida de una solicitud
//!
//! CREATED → CONTAINER_ATTACHED → ROUTE_PROPOSED → ROUTE_SELECTED →
//! CARRIER_ASSIGNED → SEGMENTS_EXECUTING → SETTLED.
//!
//! Cada transición trabaja sobre copias y solo las confirma si completa;
//! ante un error la solicitud queda en su estado previo.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::costing::CostingConfig;
use crate::models::carrier::Carrier;
use crate::models::container::CreateContainerRequest;
use crate::models::deposit::{DepositRegistry, LegCatalog};
use crate::models::fare::{FareCatalog, FareTable};
use crate::models::lifecycle::LifecycleState;
use crate::models::request::{CreateShipmentRequest, Request};
use crate::models::route::{Route, RouteOption};
use crate::models::segment::Segment;
use crate::models::snapshot::LifecycleSnapshot;
use crate::services::completeness_auditor::{self, CompletenessReport};
use crate::services::costing_service::real_cost;
use crate::services::geocoding_service::{resolve_address, AddressResolver};
use crate::services::route_assignment_service;
use crate::services::route_option_builder::RouteOptionBuilder;
use crate::services::snapshot_log::SnapshotSink;
use crate::utils::errors::{conflict_error, not_found_error, validation_error, AppError, AppResult};
use crate::utils::ids::{EntityId, IdSequence};
use crate::utils::money::round_money;

/// Datos de referencia compartidos y de solo lectura
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub fares: FareCatalog,
    pub deposits: DepositRegistry,
    pub legs: LegCatalog,
}

/// Agregado solicitud/ruta/camión en construcción
pub struct ShipmentLifecycle {
    run_id: Uuid,
    state: LifecycleState,
    config: CostingConfig,
    reference: Arc<ReferenceData>,
    ids: IdSequence,
    request: Request,
    route: Option<Route>,
    route_options: Vec<RouteOption>,
    carrier: Option<Carrier>,
    history: Vec<LifecycleSnapshot>,
    sink: Option<Box<dyn SnapshotSink + Send>>,
}

impl ShipmentLifecycle {
    /// Crear la solicitud, resolviendo las direcciones sin coordenadas explícitas
    pub async fn create(
        input: CreateShipmentRequest,
        resolver: &dyn AddressResolver,
        config: CostingConfig,
        reference: Arc<ReferenceData>,
    ) -> AppResult<Self> {
        Self::create_with_sink(input, resolver, config, reference, None).await
    }

    pub async fn create_with_sink(
        input: CreateShipmentRequest,
        resolver: &dyn AddressResolver,
        config: CostingConfig,
        reference: Arc<ReferenceData>,
        sink: Option<Box<dyn SnapshotSink + Send>>,
    ) -> AppResult<Self> {
        input.validate_input()?;
        let mut request = Request::from(input);

        if request.origin().is_none() {
            if let Some(address) = request.origin_address.clone() {
                let resolution = resolve_address("origin_address", &address, resolver).await?;
                if let Some(coordinates) = resolution.coordinates() {
                    request.set_origin(coordinates);
                }
            }
        }

        if request.destination().is_none() {
            if let Some(address) = request.destination_address.clone() {
                let resolution = resolve_address("destination_address", &address, resolver).await?;
                if let Some(coordinates) = resolution.coordinates() {
                    request.set_destination(coordinates);
                }
            }
        }

        let mut lifecycle = Self {
            run_id: Uuid::new_v4(),
            state: LifecycleState::Created,
            config,
            reference,
            ids: IdSequence::default(),
            request,
            route: None,
            route_options: Vec::new(),
            carrier: None,
            history: Vec::new(),
            sink,
        };

        info!(
            "📝 Solicitud {} creada (run {})",
            lifecycle.request.id, lifecycle.run_id
        );
        lifecycle.record("request_created");
        Ok(lifecycle)
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn route_options(&self) -> &[RouteOption] {
        &self.route_options
    }

    pub fn carrier(&self) -> Option<&Carrier> {
        self.carrier.as_ref()
    }

    pub fn history(&self) -> &[LifecycleSnapshot] {
        &self.history
    }

    /// CREATED → CONTAINER_ATTACHED
    pub fn attach_container(&mut self, input: CreateContainerRequest) -> AppResult<()> {
        self.ensure_transition(LifecycleState::ContainerAttached)?;
        if let Some(existing) = &self.request.container {
            return Err(conflict_error(
                &format!("Request {}", self.request.id),
                "container",
                &existing.id.to_string(),
            ));
        }

        let container = input.into_container()?;
        info!("📦 Contenedor {} asignado a solicitud {}", container.id, self.request.id);
        self.request.container = Some(container);
        self.advance(LifecycleState::ContainerAttached, "container_attached");
        Ok(())
    }

    /// CONTAINER_ATTACHED → ROUTE_PROPOSED
    pub fn propose_routes(&mut self) -> AppResult<()> {
        self.ensure_transition(LifecycleState::RouteProposed)?;

        let reference = Arc::clone(&self.reference);
        let builder = RouteOptionBuilder::new(&self.config, &reference.deposits, &reference.legs);
        let (origin, destination) = builder.endpoints(&self.request)?;

        let mut ids = self.ids.clone();
        let route = Route::new(ids.next_id(), self.request.id, Utc::now());
        let options = builder.build(route.id, origin, destination, &mut ids)?;

        self.ids = ids;
        self.request.route_id = Some(route.id);
        self.route = Some(route);
        self.route_options = options;
        self.advance(LifecycleState::RouteProposed, "route_options_generated");
        Ok(())
    }

    /// ROUTE_PROPOSED → ROUTE_SELECTED
    pub fn select_option(&mut self, option_id: EntityId) -> AppResult<()> {
        if self.state == LifecycleState::RouteSelected
            && self.route.as_ref().and_then(|r| r.selected_option_id) == Some(option_id)
        {
            info!("🔁 Opción {} ya seleccionada", option_id);
            return Ok(());
        }
        self.ensure_transition(LifecycleState::RouteSelected)?;

        let option = self
            .route_options
            .iter()
            .find(|o| o.id == option_id)
            .cloned()
            .ok_or_else(|| not_found_error("RouteOption", &option_id.to_string()))?;
        let fare = self.fare_table()?.clone();

        let mut route = self.current_route()?.clone();
        let mut ids = self.ids.clone();
        route_assignment_service::select_option(
            &mut route,
            &option,
            self.config.base_rate_per_km,
            &mut ids,
        )?;

        let approximate_total: Decimal = route
            .segments
            .iter()
            .filter_map(|s| s.approximate_cost)
            .sum();
        let estimated_cost =
            round_money(approximate_total) + fare.management_fee * Decimal::from(route.segments.len());

        info!(
            "💰 Estimación solicitud {}: costo={} tiempo={} h",
            self.request.id, estimated_cost, option.total_duration
        );

        self.ids = ids;
        self.route = Some(route);
        self.request.estimated_cost = Some(round_money(estimated_cost));
        self.request.estimated_time = Some(option.total_duration);
        self.advance(LifecycleState::RouteSelected, "option_selected");
        Ok(())
    }

    /// ROUTE_SELECTED → CARRIER_ASSIGNED
    pub fn assign_carrier(&mut self, carrier: Carrier) -> AppResult<()> {
        self.ensure_transition(LifecycleState::CarrierAssigned)?;

        let mut route = self.current_route()?.clone();
        route_assignment_service::assign_carrier(
            &mut route,
            &carrier,
            self.request.container.as_ref(),
            self.request.id,
        )?;

        self.route = Some(route);
        self.carrier = Some(carrier);
        self.advance(LifecycleState::CarrierAssigned, "carrier_assigned");
        Ok(())
    }

    /// CARRIER_ASSIGNED → SEGMENTS_EXECUTING
    ///
    /// El primer tramo inicia en `started_at`; cada siguiente inicia tras el
    /// fin del anterior más la espera configurada. Los costos reales se
    /// calculan con todos los tramos ya fechados.
    pub fn execute_segments(&mut self, started_at: DateTime<Utc>) -> AppResult<()> {
        self.ensure_transition(LifecycleState::SegmentsExecuting)?;
        let fare = self.fare_table()?.clone();

        let mut route = self.current_route()?.clone();
        route.segments.sort_by_key(|s| s.order);

        let mut previous_end: Option<DateTime<Utc>> = None;
        for segment in route.segments.iter_mut() {
            let start = match previous_end {
                None => started_at,
                Some(end) => end
                    .checked_add_signed(self.config.inter_segment_gap)
                    .ok_or_else(|| out_of_range(segment))?,
            };
            let end = start
                .checked_add_signed(hours_to_duration(segment)?)
                .ok_or_else(|| out_of_range(segment))?;
            segment.actual_start = Some(start);
            segment.actual_end = Some(end);
            previous_end = Some(end);
        }

        let timed: Vec<Segment> = route.segments.clone();
        for segment in route.segments.iter_mut() {
            let cost = real_cost(
                segment,
                self.carrier.as_ref(),
                &fare,
                &self.reference.deposits,
                &timed,
            );
            debug!(
                "   Tramo {} finalizado: inicio={:?} fin={:?} costo_real={}",
                segment.order, segment.actual_start, segment.actual_end, cost
            );
            segment.real_cost = Some(cost);
        }

        info!(
            "🚛 {} tramos ejecutados en ruta {}",
            route.segments.len(),
            route.id
        );
        self.route = Some(route);
        self.advance(LifecycleState::SegmentsExecuting, "segments_executed");
        Ok(())
    }

    /// SEGMENTS_EXECUTING → SETTLED; repetir la liquidación da el mismo resultado
    pub fn settle(&mut self) -> AppResult<Decimal> {
        let already_settled = self.state == LifecycleState::Settled;
        if !already_settled {
            self.ensure_transition(LifecycleState::Settled)?;
        }
        let fare = self.fare_table()?.clone();
        let route = self.current_route()?;

        let mut real_total = Decimal::ZERO;
        let mut total_time = Decimal::ZERO;
        for segment in &route.segments {
            let cost = segment.real_cost.ok_or_else(|| {
                validation_error(&format!("segment {} has no real cost", segment.order))
            })?;
            real_total += cost;
            total_time += segment.duration_or_zero();
        }

        let management = fare.management_fee * Decimal::from(route.segments.len());
        let final_cost = round_money(round_money(real_total) + management);

        if already_settled {
            if self.request.final_cost != Some(final_cost) {
                warn!(
                    "⚠️ Liquidación repetida difiere: {:?} vs {}",
                    self.request.final_cost, final_cost
                );
            }
            return Ok(final_cost);
        }

        info!(
            "🧾 Ruta {} liquidada: tramos={} gestión={} final={} tiempo={} h",
            route.id, real_total, management, final_cost, total_time
        );
        self.request.final_cost = Some(final_cost);
        self.request.final_time = Some(total_time);
        self.advance(LifecycleState::Settled, "route_settled");
        Ok(final_cost)
    }

    /// Campos críticos todavía ausentes
    pub fn required_field_gaps(&self) -> Vec<String> {
        let mut missing = Vec::new();
        let request = &self.request;
        if request.container.is_none() {
            missing.push("Request.container".to_string());
        }
        if request.final_cost.is_none() {
            missing.push("Request.final_cost".to_string());
        }
        if request.final_time.is_none() {
            missing.push("Request.final_time".to_string());
        }
        if request.route_id.is_none() {
            missing.push("Request.route_id".to_string());
        }

        for segment in self.route.iter().flat_map(|r| r.segments_in_order()) {
            let checks = [
                ("carrier_plate", segment.carrier_plate.is_some()),
                ("actual_start", segment.actual_start.is_some()),
                ("actual_end", segment.actual_end.is_some()),
                ("real_cost", segment.real_cost.is_some()),
            ];
            for (field, present) in checks {
                if !present {
                    missing.push(format!("Segment[{}].{}", segment.id, field));
                }
            }
        }
        missing
    }

    /// Informe de campos nunca poblados en el historial
    pub fn audit(&self) -> CompletenessReport {
        completeness_auditor::audit(&self.history)
    }

    fn fare_table(&self) -> AppResult<&FareTable> {
        let id = self
            .request
            .fare_table_id
            .ok_or_else(|| validation_error("request has no fare table"))?;
        self.reference.fares.get(id)
    }

    fn current_route(&self) -> AppResult<&Route> {
        self.route
            .as_ref()
            .ok_or_else(|| validation_error("request has no route"))
    }

    fn ensure_transition(&self, to: LifecycleState) -> AppResult<()> {
        if self.state.next() == Some(to) {
            Ok(())
        } else {
            Err(AppError::InvalidTransition {
                from: self.state,
                to,
            })
        }
    }

    fn advance(&mut self, to: LifecycleState, step: &str) {
        debug!("➡️ {} -> {}", self.state, to);
        self.state = to;
        self.record(step);
    }

    fn record(&mut self, step: &str) {
        let snapshot = LifecycleSnapshot {
            run_id: self.run_id,
            step: step.to_string(),
            state: self.state,
            timestamp: Utc::now(),
            request: Some(self.request.clone()),
            route: self.route.clone(),
            route_options: (!self.route_options.is_empty()).then(|| self.route_options.clone()),
            carrier: self.carrier.clone(),
        };

        if let Some(sink) = self.sink.as_mut() {
            if let Err(e) = sink.record(&snapshot) {
                warn!("⚠️ No se pudo escribir snapshot '{}': {}", step, e);
            }
        }
        self.history.push(snapshot);
    }
}

/// Duración del tramo en horas como `chrono::Duration`
fn hours_to_duration(segment: &Segment) -> AppResult<Duration> {
    segment
        .duration_or_zero()
        .checked_mul(dec!(3600))
        .and_then(|seconds| seconds.round().to_i64())
        .and_then(Duration::try_seconds)
        .ok_or_else(|| out_of_range(segment))
}

fn out_of_range(segment: &Segment) -> AppError {
    validation_error(&format!("segment {} timing out of range", segment.order))
}
