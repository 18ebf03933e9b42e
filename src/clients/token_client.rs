//! Cliente OAuth2 (password grant) para obtener bearer tokens

use reqwest::Client;

use crate::config::environment::GeocodingConfig;
use crate::dto::geocoding_dto::{PasswordGrantForm, TokenResponse};
use crate::utils::errors::{AppError, AppResult};

/// Cliente del endpoint de tokens
pub struct PasswordGrantClient {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    username: String,
    password: String,
}

impl PasswordGrantClient {
    pub fn new(client: Client, config: &GeocodingConfig) -> Self {
        Self {
            client,
            token_url: config.token_endpoint(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }

    /// Solicitar un access token; un único intento
    pub async fn access_token(&self) -> AppResult<String> {
        log::debug!("🔐 Solicitando token a {}", self.token_url);

        let form = PasswordGrantForm {
            grant_type: "password",
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            username: &self.username,
            password: &self.password,
        };

        let response = self
            .client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ExternalApi(format!(
                "token endpoint answered {}",
                status
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("invalid token response: {}", e)))?;

        log::debug!("✅ Token obtenido (expira en {:?} s)", token.expires_in);
        Ok(token.access_token)
    }
}
