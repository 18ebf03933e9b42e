//! Resolución de direcciones a coordenadas
//!
//! Un literal "lat,lon" se resuelve localmente. Una dirección de texto
//! requiere un bearer token y una llamada al servicio externo; cualquier
//! falla externa degrada a coordenadas ausentes, nunca a un error.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::clients::token_client::PasswordGrantClient;
use crate::config::environment::GeocodingConfig;
use crate::dto::geocoding_dto::GeocodeResponse;
use crate::models::location::Coordinates;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{
    parse_coordinate_literal, reject_deposit_identifier, validate_coordinates, CoordinateLiteral,
};

/// Origen de unas coordenadas resueltas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResolutionSource {
    Literal,
    External,
}

/// Motivo por el que una dirección quedó sin coordenadas
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum UnresolvedReason {
    OutOfRange,
    TokenUnavailable(String),
    HttpStatus(u16),
    Transport(String),
    Timeout,
    NoCoordinates,
}

/// Resultado explícito de la resolución
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Resolution {
    Resolved {
        coordinates: Coordinates,
        source: ResolutionSource,
    },
    Unresolved {
        reason: UnresolvedReason,
    },
}

impl Resolution {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Resolution::Resolved { coordinates, .. } => Some(*coordinates),
            Resolution::Unresolved { .. } => None,
        }
    }

    fn unresolved(reason: UnresolvedReason) -> Self {
        Resolution::Unresolved { reason }
    }
}

/// Colaborador externo de geocodificación de texto libre
#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn geocode(&self, address: &str) -> Resolution;
}

/// Resolver una dirección: rechaza IDs de depósito, parsea literales
/// localmente y delega el texto libre al servicio externo.
pub async fn resolve_address(
    field: &'static str,
    address: &str,
    resolver: &dyn AddressResolver,
) -> AppResult<Resolution> {
    reject_deposit_identifier(field, Some(address))?;

    match parse_coordinate_literal(address) {
        Some(CoordinateLiteral::Valid(coordinates)) => {
            log::debug!("📍 {} resuelto localmente: {}", field, coordinates);
            Ok(Resolution::Resolved {
                coordinates,
                source: ResolutionSource::Literal,
            })
        }
        Some(CoordinateLiteral::OutOfRange) => {
            log::warn!("⚠️ {} fuera de rango: {}", field, address);
            Ok(Resolution::unresolved(UnresolvedReason::OutOfRange))
        }
        None => {
            let resolution = resolver.geocode(address).await;
            if let Resolution::Unresolved { reason } = &resolution {
                log::warn!(
                    "⚠️ Geocodificación no disponible para {} '{}': {:?}",
                    field,
                    address,
                    reason
                );
            }
            Ok(resolution)
        }
    }
}

/// Servicio HTTP de geocodificación autenticado con bearer token
pub struct GeocodingService {
    client: Client,
    tokens: PasswordGrantClient,
    geocode_url: String,
}

impl GeocodingService {
    pub fn new(config: &GeocodingConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            tokens: PasswordGrantClient::new(client.clone(), config),
            client,
            geocode_url: config.geocode_url.clone(),
        })
    }

    fn transport_reason(error: &reqwest::Error) -> UnresolvedReason {
        if error.is_timeout() {
            UnresolvedReason::Timeout
        } else {
            UnresolvedReason::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl AddressResolver for GeocodingService {
    async fn geocode(&self, address: &str) -> Resolution {
        log::info!("🗺️ Geocoding address: {}", urlencoding::encode(address));

        let token = match self.tokens.access_token().await {
            Ok(token) => token,
            Err(e) => {
                log::warn!("⚠️ No se pudo obtener token: {}", e);
                return Resolution::unresolved(UnresolvedReason::TokenUnavailable(e.to_string()));
            }
        };

        let response = match self
            .client
            .get(&self.geocode_url)
            .query(&[("direccion", address)])
            .bearer_auth(token)
            .header("Accept", "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::error!("❌ Error llamando al geocodificador: {}", e);
                return Resolution::unresolved(Self::transport_reason(&e));
            }
        };

        let status = response.status();
        log::info!("📡 Response status: {}", status);
        if status != StatusCode::OK {
            return Resolution::unresolved(UnresolvedReason::HttpStatus(status.as_u16()));
        }

        let body: GeocodeResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                log::error!("❌ Respuesta de geocodificación inválida: {}", e);
                return Resolution::unresolved(Self::transport_reason(&e));
            }
        };

        match coordinates_from(&body) {
            Some(coordinates) => {
                log::info!("✅ Geocoding successful: ({})", coordinates);
                Resolution::Resolved {
                    coordinates,
                    source: ResolutionSource::External,
                }
            }
            None => {
                log::warn!("⚠️ No coordinates found for address");
                Resolution::unresolved(UnresolvedReason::NoCoordinates)
            }
        }
    }
}

fn coordinates_from(body: &GeocodeResponse) -> Option<Coordinates> {
    let latitude = Decimal::try_from(body.latitud?).ok()?;
    let longitude = Decimal::try_from(body.longitud?).ok()?;
    validate_coordinates(latitude, longitude).ok()?;
    Some(Coordinates::new(latitude, longitude))
}
