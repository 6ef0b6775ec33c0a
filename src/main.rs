/// Servidor do painel de suporte
///
/// Arquitetura:
/// - Cada visão do painel monta uma árvore de categorias (POST /arvores)
/// - Os gestos da UI (alternar, expandir tudo, recolher tudo, selecionar)
///   chegam como POSTs e devolvem a visão renderizada
/// - Filhos vêm sob demanda da API pública de categorias do Mercado Livre e
///   ficam em cache enquanto a visão estiver montada

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use painel_suporte::config::Settings;
use painel_suporte::utils::{logging::*, AppError};
use painel_suporte::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Carregar .env se existir (desenvolvimento local)
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    // Inicializar tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,painel_suporte=debug,arvore=debug")),
        )
        .init();

    if dotenv_loaded {
        tracing::info!("✅ Arquivo .env carregado com sucesso");
    } else {
        tracing::debug!("Arquivo .env não encontrado - usando variáveis de ambiente do sistema");
    }

    // Carregar configurações
    let settings = Settings::new()
        .map_err(|e| AppError::ConfigError(format!("Failed to load settings: {}", e)))?;

    log_config_loaded(&std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()));
    log_info(&format!(
        "🛒 Mercado Livre: {} (site {}), expandir tudo limitado a {} raízes / {} filhos",
        settings.mercadolivre.base_url,
        settings.mercadolivre.site_id,
        settings.arvore.root_fan_out,
        settings.arvore.child_fan_out
    ));

    let app_state = Arc::new(AppState::new(settings.clone())?);

    if app_state.mercadolivre.has_access_token() {
        log_info("🔑 Token do Mercado Livre configurado");
    } else {
        log_info("ℹ️ Sem token do Mercado Livre - usando endpoints públicos");
    }

    let app = build_router(app_state);

    // Iniciar servidor
    // No Cloud Run, usar a variável de ambiente PORT
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(settings.server.port);
    let listener = TcpListener::bind(format!("{}:{}", settings.server.host, port)).await?;

    log_server_startup(port);
    log_server_ready(port);

    // Graceful shutdown com signal handling
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log_info("🛑 Server shut down gracefully");
    Ok(())
}

/// Signal handler para graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log_warning(&format!("Falha ao instalar handler de Ctrl+C: {}", e));
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log_warning(&format!("Falha ao instalar handler de SIGTERM: {}", e));
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log_info("Sinal de desligamento recebido");
}
