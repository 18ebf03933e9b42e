//! DTOs del servicio de geocodificación y del proveedor de tokens

use serde::{Deserialize, Serialize};

/// Respuesta del endpoint OAuth2 (password grant)
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
}

/// Formulario del password grant
#[derive(Debug, Serialize)]
pub struct PasswordGrantForm<'a> {
    pub grant_type: &'static str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

/// Respuesta del endpoint de geocodificación.
///
/// El servicio responde con nombres en español o en inglés según versión.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    #[serde(alias = "latitude", alias = "lat")]
    pub latitud: Option<f64>,
    #[serde(alias = "longitude", alias = "lon")]
    pub longitud: Option<f64>,
}
