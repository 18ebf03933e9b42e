//! Coordenadas geográficas

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Par latitud/longitud
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl Coordinates {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self { latitude, longitude }
    }

    /// Distancia euclídea al cuadrado en grados, suficiente para comparar cercanía
    pub fn squared_degree_distance(&self, other: &Coordinates) -> Decimal {
        let dlat = self.latitude - other.latitude;
        let dlng = self.longitude - other.longitude;
        dlat * dlat + dlng * dlng
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}
