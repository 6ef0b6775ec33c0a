//! Tipos de erro para o crate mercadolivre

use thiserror::Error;

/// Erros do cliente Mercado Livre
#[derive(Debug, Error)]
pub enum MercadoLivreError {
    /// Erro de requisição HTTP (conexão, timeout de transporte, corpo inválido)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Erro da API do Mercado Livre (status code não-2xx)
    #[error("Mercado Livre API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Erro de parsing JSON
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Erro de configuração
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl MercadoLivreError {
    /// Status HTTP retornado pela API, quando houver
    pub fn status(&self) -> Option<u16> {
        match self {
            MercadoLivreError::ApiError { status, .. } => Some(*status),
            MercadoLivreError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Tipo Result padrão para o crate
pub type Result<T> = std::result::Result<T, MercadoLivreError>;
