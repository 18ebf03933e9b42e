//! Estados del ciclo de vida de una solicitud

use serde::{Deserialize, Serialize};

/// Máquina de estados lineal, solo hacia adelante
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    Created,
    ContainerAttached,
    RouteProposed,
    RouteSelected,
    CarrierAssigned,
    SegmentsExecuting,
    Settled,
}

impl LifecycleState {
    /// Estado siguiente, si existe
    pub fn next(self) -> Option<LifecycleState> {
        use LifecycleState::*;
        match self {
            Created => Some(ContainerAttached),
            ContainerAttached => Some(RouteProposed),
            RouteProposed => Some(RouteSelected),
            RouteSelected => Some(CarrierAssigned),
            CarrierAssigned => Some(SegmentsExecuting),
            SegmentsExecuting => Some(Settled),
            Settled => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        use LifecycleState::*;
        match self {
            Created => "CREATED",
            ContainerAttached => "CONTAINER_ATTACHED",
            RouteProposed => "ROUTE_PROPOSED",
            RouteSelected => "ROUTE_SELECTED",
            CarrierAssigned => "CARRIER_ASSIGNED",
            SegmentsExecuting => "SEGMENTS_EXECUTING",
            Settled => "SETTLED",
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
