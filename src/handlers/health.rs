use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::utils::logging::*;
use crate::AppState;

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    log_health_check();

    Json(json!({
        "status": "healthy",
        "service": "painel-suporte",
        "version": env!("CARGO_PKG_VERSION"),
        "arvores_montadas": state.sessions.len().await,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub async fn ready_check(State(state): State<Arc<AppState>>) -> Result<Json<Value>, StatusCode> {
    log_health_check();

    // Testa a conexão com o Mercado Livre
    let mercadolivre_status = match state.mercadolivre.list_site_categories().await {
        Ok(_) => "connected",
        Err(e) => {
            log_mercadolivre_api_error("list_site_categories", e.status(), &e.to_string());
            "disconnected"
        }
    };

    if mercadolivre_status != "connected" {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(json!({
        "ready": true,
        "service": "painel-suporte",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "dependencies": {
            "mercadolivre": {
                "status": mercadolivre_status,
                "site_id": state.settings.mercadolivre.site_id,
                "token_configured": state.mercadolivre.has_access_token()
            }
        }
    })))
}
