//! Cliente HTTP para a API do Mercado Livre

use crate::error::{MercadoLivreError, Result};
use reqwest::{Client as HttpClient, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.mercadolibre.com";
pub const DEFAULT_SITE_ID: &str = "MLB";

/// Cliente para interagir com a API do Mercado Livre
#[derive(Clone)]
pub struct MercadoLivreClient {
    http_client: HttpClient,
    base_url: String,
    site_id: String,
    access_token: Option<String>,
}

impl MercadoLivreClient {
    /// Cria um novo cliente
    ///
    /// # Argumentos
    ///
    /// * `base_url` - Raiz da API (ex: `https://api.mercadolibre.com`)
    /// * `site_id` - Site do marketplace (ex: `MLB` para o Brasil)
    ///
    /// # Timeouts
    ///
    /// - Total: 30s
    /// - Connect: 5s
    pub fn new(base_url: impl Into<String>, site_id: impl Into<String>) -> Result<Self> {
        Self::with_timeouts(base_url, site_id, 30, 5)
    }

    /// Cria um novo cliente com timeouts customizados
    pub fn with_timeouts(
        base_url: impl Into<String>,
        site_id: impl Into<String>,
        total_timeout_secs: u64,
        connect_timeout_secs: u64,
    ) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(total_timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .build()
            .map_err(|e| MercadoLivreError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        let site_id = site_id.into();
        if site_id.trim().is_empty() {
            return Err(MercadoLivreError::ConfigError("site_id vazio".to_string()));
        }

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            site_id,
            access_token: None,
        })
    }

    /// Define o token OAuth enviado como `Authorization: Bearer`
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.access_token = if token.trim().is_empty() { None } else { Some(token) };
        self
    }

    /// Executa uma requisição GET
    pub(crate) async fn get(&self, endpoint: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);

        tracing::debug!("GET {}", url);

        let mut request = self
            .http_client
            .get(&url)
            .header("Accept", "application/json");

        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        self.handle_response(response).await
    }

    /// Executa uma requisição GET e parseia JSON
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self.get(endpoint).await?;
        let body = response.text().await?;
        let json = serde_json::from_str(&body)?;
        Ok(json)
    }

    /// Processa a resposta HTTP e trata erros
    async fn handle_response(&self, response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        let error_body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

        tracing::error!("Mercado Livre API error ({}): {}", status_code, error_body);

        // Tentar extrair mensagem de erro do JSON
        let message = match serde_json::from_str::<Value>(&error_body) {
            Ok(json) => json
                .get("message")
                .or_else(|| json.get("error"))
                .and_then(|v| v.as_str())
                .unwrap_or(&error_body)
                .to_string(),
            Err(_) => error_body,
        };

        Err(MercadoLivreError::ApiError {
            status: status_code,
            message,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }
}

impl std::fmt::Debug for MercadoLivreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MercadoLivreClient")
            .field("base_url", &self.base_url)
            .field("site_id", &self.site_id)
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .finish()
    }
}
