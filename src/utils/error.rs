use arvore::TreeError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mercadolivre::MercadoLivreError;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    MercadoLivreApi(String),
    ConfigError(String),
    ValidationError(String),
    NotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MercadoLivreApi(msg) => write!(f, "Mercado Livre API error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<MercadoLivreError> for AppError {
    fn from(err: MercadoLivreError) -> Self {
        match err {
            MercadoLivreError::ConfigError(msg) => AppError::ConfigError(msg),
            other => AppError::MercadoLivreApi(other.to_string()),
        }
    }
}

impl From<TreeError> for AppError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::NodeNotFound(id) => AppError::NotFound(format!("categoria {} não está na árvore", id)),
            other => AppError::MercadoLivreApi(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::MercadoLivreApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::ConfigError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = json!({
            "error": error_message,
            "status": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
