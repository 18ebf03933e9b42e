//! Modelo de Request (solicitud de transporte)
//!
//! Origen y destino se expresan como dirección de texto o como
//! literal "lat,lon"; nunca como ID de depósito.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::container::Container;
use crate::models::location::Coordinates;
use crate::models::snapshot::TrackedFields;
use crate::utils::errors::AppResult;
use crate::utils::ids::EntityId;
use crate::utils::validation::reject_deposit_identifier;

/// Request principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: EntityId,
    pub container: Option<Container>,
    pub customer_id: Option<EntityId>,
    pub origin_address: Option<String>,
    pub destination_address: Option<String>,
    pub origin_latitude: Option<Decimal>,
    pub origin_longitude: Option<Decimal>,
    pub destination_latitude: Option<Decimal>,
    pub destination_longitude: Option<Decimal>,
    pub estimated_cost: Option<Decimal>,
    pub estimated_time: Option<Decimal>,
    pub final_cost: Option<Decimal>,
    pub final_time: Option<Decimal>,
    pub route_id: Option<EntityId>,
    pub fare_table_id: Option<EntityId>,
}

/// Request para crear una nueva solicitud
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateShipmentRequest {
    pub id: EntityId,
    pub customer_id: Option<EntityId>,

    #[validate(length(min = 1, max = 500))]
    pub origin_address: Option<String>,

    #[validate(length(min = 1, max = 500))]
    pub destination_address: Option<String>,

    pub origin: Option<Coordinates>,
    pub destination: Option<Coordinates>,
    pub fare_table_id: Option<EntityId>,
}

impl CreateShipmentRequest {
    /// Validar la solicitud antes de cualquier intento de geocodificación
    pub fn validate_input(&self) -> AppResult<()> {
        self.validate()?;
        reject_deposit_identifier("origin_address", self.origin_address.as_deref())?;
        reject_deposit_identifier("destination_address", self.destination_address.as_deref())?;
        Ok(())
    }
}

impl From<CreateShipmentRequest> for Request {
    fn from(input: CreateShipmentRequest) -> Self {
        Self {
            id: input.id,
            container: None,
            customer_id: input.customer_id,
            origin_address: input.origin_address,
            destination_address: input.destination_address,
            origin_latitude: input.origin.map(|c| c.latitude),
            origin_longitude: input.origin.map(|c| c.longitude),
            destination_latitude: input.destination.map(|c| c.latitude),
            destination_longitude: input.destination.map(|c| c.longitude),
            estimated_cost: None,
            estimated_time: None,
            final_cost: None,
            final_time: None,
            route_id: None,
            fare_table_id: input.fare_table_id,
        }
    }
}

impl Request {
    pub fn origin(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.origin_latitude?, self.origin_longitude?))
    }

    pub fn destination(&self) -> Option<Coordinates> {
        Some(Coordinates::new(
            self.destination_latitude?,
            self.destination_longitude?,
        ))
    }

    pub fn set_origin(&mut self, coordinates: Coordinates) {
        self.origin_latitude = Some(coordinates.latitude);
        self.origin_longitude = Some(coordinates.longitude);
    }

    pub fn set_destination(&mut self, coordinates: Coordinates) {
        self.destination_latitude = Some(coordinates.latitude);
        self.destination_longitude = Some(coordinates.longitude);
    }
}

impl TrackedFields for Request {
    const ENTITY: &'static str = "request";

    fn field_presence(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("id", true),
            ("container", self.container.is_some()),
            ("customer_id", self.customer_id.is_some()),
            ("origin_address", self.origin_address.is_some()),
            ("destination_address", self.destination_address.is_some()),
            ("origin_latitude", self.origin_latitude.is_some()),
            ("origin_longitude", self.origin_longitude.is_some()),
            ("destination_latitude", self.destination_latitude.is_some()),
            ("destination_longitude", self.destination_longitude.is_some()),
            ("estimated_cost", self.estimated_cost.is_some()),
            ("estimated_time", self.estimated_time.is_some()),
            ("final_cost", self.final_cost.is_some()),
            ("final_time", self.final_time.is_some()),
            ("route_id", self.route_id.is_some()),
            ("fare_table_id", self.fare_table_id.is_some()),
        ]
    }
}
