//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! de entrada: cantidades, coordenadas y direcciones.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

use crate::models::location::Coordinates;
use crate::utils::errors::{AppError, AppResult};

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validador custom para campos `Decimal` (peso, volumen)
pub fn validate_non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative(*value)
}

/// Validar rango de coordenadas GPS
pub fn validate_coordinates(lat: Decimal, lng: Decimal) -> Result<(), ValidationError> {
    if lat < Decimal::from(-90) || lat > Decimal::from(90) {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &lat);
        error.add_param("range".into(), &"-90.0 to 90.0".to_string());
        return Err(error);
    }

    if lng < Decimal::from(-180) || lng > Decimal::from(180) {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &lng);
        error.add_param("range".into(), &"-180.0 to 180.0".to_string());
        return Err(error);
    }

    Ok(())
}

/// Un identificador de depósito es un entero sin formato, de cualquier longitud
pub fn is_deposit_identifier(value: &str) -> bool {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix('+')
        .or_else(|| trimmed.strip_prefix('-'))
        .unwrap_or(trimmed);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Rechazar direcciones que son en realidad IDs de depósito
pub fn reject_deposit_identifier(field: &'static str, value: Option<&str>) -> AppResult<()> {
    match value {
        Some(v) if is_deposit_identifier(v) => Err(AppError::DepositIdentifierInAddress {
            field,
            value: v.trim().to_string(),
        }),
        _ => Ok(()),
    }
}

/// Literal "lat,lon" reconocido localmente
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateLiteral {
    /// Dos tokens numéricos dentro de rango
    Valid(Coordinates),
    /// Dos tokens numéricos, pero fuera de rango
    OutOfRange,
}

/// Parsear una dirección en formato "lat,lon".
///
/// Devuelve `None` si el texto no son exactamente dos tokens numéricos
/// separados por coma, en cuyo caso hay que geocodificarlo.
pub fn parse_coordinate_literal(value: &str) -> Option<CoordinateLiteral> {
    let mut parts = value.split(',');
    let (lat, lng) = match (parts.next(), parts.next(), parts.next()) {
        (Some(lat), Some(lng), None) => (lat.trim(), lng.trim()),
        _ => return None,
    };

    let lat = Decimal::from_str(lat).ok()?;
    let lng = Decimal::from_str(lng).ok()?;

    match validate_coordinates(lat, lng) {
        Ok(()) => Some(CoordinateLiteral::Valid(Coordinates::new(lat, lng))),
        Err(_) => Some(CoordinateLiteral::OutOfRange),
    }
}
