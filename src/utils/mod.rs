//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! redondeo monetario y generación de identificadores.

pub mod errors;
pub mod ids;
pub mod money;
pub mod validation;

pub use errors::{AppError, AppResult, ErrorKind};
