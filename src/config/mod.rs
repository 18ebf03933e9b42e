//! Configuración del proyecto
//!
//! Este módulo contiene la configuración de entorno y las constantes
//! de planificación del motor de costos.

pub mod costing;
pub mod environment;

pub use costing::CostingConfig;
pub use environment::{EnvironmentConfig, GeocodingConfig};
