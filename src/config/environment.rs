//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno: nivel de logging,
//! credenciales del proveedor de tokens y endpoint de geocodificación.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::errors::{configuration_error, AppResult};

/// Credenciales y endpoints del servicio de geocodificación
#[derive(Debug, Clone)]
pub struct GeocodingConfig {
    pub authority_url: String,
    pub realm: String,
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub geocode_url: String,
    pub timeout: Duration,
}

impl GeocodingConfig {
    /// Endpoint OAuth2 (password grant) del realm configurado
    pub fn token_endpoint(&self) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.authority_url.trim_end_matches('/'),
            self.realm
        )
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub log_level: tracing::Level,
    pub geocoding: GeocodingConfig,
    pub snapshot_log_path: Option<PathBuf>,
}

impl EnvironmentConfig {
    /// Leer la configuración desde variables de entorno
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construir la configuración a partir de una función de búsqueda
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let log_level_raw = var("LOG_LEVEL", "debug");
        let log_level = log_level_raw
            .parse::<tracing::Level>()
            .map_err(|_| configuration_error("LOG_LEVEL", &log_level_raw))?;

        let timeout_raw = var("GEOCODING_TIMEOUT_SECS", "10");
        let timeout_secs = timeout_raw
            .parse::<u64>()
            .map_err(|_| configuration_error("GEOCODING_TIMEOUT_SECS", &timeout_raw))?;

        let snapshot_log_path = lookup("SNAPSHOT_LOG_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment: var("ENVIRONMENT", "development"),
            log_level,
            geocoding: GeocodingConfig {
                authority_url: var("KEYCLOAK_URL", "http://localhost:8089"),
                realm: var("KEYCLOAK_REALM", "tpi-backend"),
                client_id: var("KC_CLIENT_ID", "postman-test"),
                client_secret: var("KC_CLIENT_SECRET", ""),
                username: var("KC_USERNAME", ""),
                password: var("KC_PASSWORD", ""),
                geocode_url: var("GEOCODING_URL", "http://localhost:8080/api/v1/gestion/geocode"),
                timeout: Duration::from_secs(timeout_secs),
            },
            snapshot_log_path,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
