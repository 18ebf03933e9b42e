//! Services module
//!
//! Este módulo contiene la lógica de negocio del ciclo de vida:
//! costos, generación y asignación de rutas, geocodificación,
//! registro de snapshots y auditoría de completitud.

pub mod completeness_auditor;
pub mod costing_service;
pub mod geocoding_service;
pub mod lifecycle_orchestrator;
pub mod route_assignment_service;
pub mod route_option_builder;
pub mod snapshot_log;

pub use completeness_auditor::{audit, CompletenessReport};
pub use geocoding_service::{AddressResolver, GeocodingService, Resolution};
pub use lifecycle_orchestrator::{ReferenceData, ShipmentLifecycle};
pub use snapshot_log::{JsonLinesSnapshotLog, MemorySnapshotLog, SnapshotSink};
