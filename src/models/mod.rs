//! Modelos del sistema
//!
//! Este módulo contiene las entidades del ciclo de vida de un envío:
//! solicitud, contenedor, camión, ruta, tramos y datos de referencia.

pub mod carrier;
pub mod container;
pub mod deposit;
pub mod fare;
pub mod lifecycle;
pub mod location;
pub mod request;
pub mod route;
pub mod segment;
pub mod snapshot;

pub use carrier::{CapacityDimension, Carrier};
pub use container::{Container, CreateContainerRequest};
pub use deposit::{Deposit, DepositRegistry, LegCatalog, LegMetrics};
pub use fare::{FareCatalog, FareTable};
pub use lifecycle::LifecycleState;
pub use location::Coordinates;
pub use request::{CreateShipmentRequest, Request};
pub use route::{Route, RouteOption};
pub use segment::Segment;
pub use snapshot::{LifecycleSnapshot, TrackedFields};
