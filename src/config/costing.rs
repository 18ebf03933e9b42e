//! Constantes de planificación
//!
//! Tarifa base por km para costos aproximados, espera entre tramos
//! y límites de la generación de opciones.

use std::str::FromStr;

use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::utils::errors::{configuration_error, AppResult};

/// Configuración del motor de costos y rutas
#[derive(Debug, Clone)]
pub struct CostingConfig {
    /// Costo base por km para el costo aproximado
    pub base_rate_per_km: Decimal,
    /// Espera fija entre el fin de un tramo y el inicio del siguiente
    pub inter_segment_gap: Duration,
    pub max_intermediate_stops: usize,
    pub max_route_options: usize,
}

impl Default for CostingConfig {
    fn default() -> Self {
        Self {
            base_rate_per_km: dec!(8.00),
            inter_segment_gap: Duration::hours(4),
            max_intermediate_stops: 1,
            max_route_options: 4,
        }
    }
}

impl CostingConfig {
    /// Defaults con overrides opcionales desde el entorno
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("BASE_RATE_PER_KM") {
            config.base_rate_per_km = Decimal::from_str(raw.trim())
                .ok()
                .filter(|rate| !rate.is_sign_negative())
                .ok_or_else(|| configuration_error("BASE_RATE_PER_KM", &raw))?;
        }

        if let Some(raw) = lookup("INTER_SEGMENT_GAP_HOURS") {
            config.inter_segment_gap = raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|h| *h >= 0)
                .and_then(Duration::try_hours)
                .ok_or_else(|| configuration_error("INTER_SEGMENT_GAP_HOURS", &raw))?;
        }

        Ok(config)
    }

    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}
