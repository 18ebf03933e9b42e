//! Motor de costos y ciclo de vida de envíos de carga
//!
//! Solicitud → contenedor → opciones de ruta → selección → camión →
//! ejecución de tramos → liquidación, con snapshots auditables.

pub mod clients;
pub mod config;
pub mod dto;
pub mod models;
pub mod services;
pub mod utils;
