// Biblioteca do painel de suporte
// Expõe módulos para uso em testes e binários

pub mod config;
pub mod handlers;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use mercadolivre::MercadoLivreClient;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use services::{MercadoLivreSource, TreeSessions};
use utils::AppError;

// AppState é definido aqui para ser compartilhado
#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub mercadolivre: MercadoLivreClient,
    pub sessions: TreeSessions,
}

impl AppState {
    pub fn new(settings: config::Settings) -> Result<Self, AppError> {
        let ml = &settings.mercadolivre;
        let mut client = MercadoLivreClient::with_timeouts(
            ml.base_url.clone(),
            ml.site_id.clone(),
            ml.timeout_seconds,
            ml.connect_timeout_seconds,
        )?;
        if let Some(token) = &ml.access_token {
            client = client.with_access_token(token.clone());
        }

        let sessions = TreeSessions::new(
            MercadoLivreSource::new(client.clone()),
            settings.arvore.limits(),
            settings.arvore.idle_ttl(),
        );

        Ok(Self {
            settings,
            mercadolivre: client,
            sessions,
        })
    }
}

/// Rotas do serviço
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health checks (públicos)
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::ready_check))

        // Árvores de categorias
        .route("/arvores", post(handlers::mount_tree))
        .route("/arvores/:tree_id", get(handlers::get_tree).delete(handlers::unmount_tree))
        .route("/arvores/:tree_id/recarregar", post(handlers::reload_tree))
        .route("/arvores/:tree_id/expandir-tudo", post(handlers::expand_all))
        .route("/arvores/:tree_id/recolher-tudo", post(handlers::collapse_all))
        .route("/arvores/:tree_id/nos/:node_id/alternar", post(handlers::toggle_node))
        .route("/arvores/:tree_id/nos/:node_id/selecionar", post(handlers::select_node))

        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
