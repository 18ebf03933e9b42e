//! Snapshots del ciclo de vida
//!
//! Cada paso del ciclo produce un registro serializable con la copia
//! puntual de la solicitud, la ruta, las opciones y el camión.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::carrier::Carrier;
use crate::models::lifecycle::LifecycleState;
use crate::models::request::Request;
use crate::models::route::{Route, RouteOption};

/// Entidad con un conjunto conocido de campos rastreables
pub trait TrackedFields {
    /// Nombre del tipo de entidad en los informes
    const ENTITY: &'static str;

    /// Pares (campo, poblado) en orden de declaración
    fn field_presence(&self) -> Vec<(&'static str, bool)>;
}

/// Registro puntual de un paso del ciclo de vida
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleSnapshot {
    pub run_id: Uuid,
    pub step: String,
    pub state: LifecycleState,
    pub timestamp: DateTime<Utc>,
    pub request: Option<Request>,
    pub route: Option<Route>,
    pub route_options: Option<Vec<RouteOption>>,
    pub carrier: Option<Carrier>,
}
