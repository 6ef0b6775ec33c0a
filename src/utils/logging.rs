use tracing::{debug, error, info, warn};

pub fn log_request_received(endpoint: &str, method: &str) {
    info!("Request received: {} {}", method, endpoint);
}

pub fn log_request_processed(endpoint: &str, status: u16, duration_ms: u64) {
    info!("Request processed: {} - Status: {} - Duration: {}ms",
          endpoint, status, duration_ms);
}

pub fn log_mercadolivre_api_error(endpoint: &str, status: Option<u16>, error: &str) {
    error!("Mercado Livre API error: {} - Status: {:?} - Error: {}", endpoint, status, error);
}

pub fn log_config_loaded(env: &str) {
    info!("Configuration loaded successfully for environment: {}", env);
}

pub fn log_server_startup(port: u16) {
    info!("🚀 painel-suporte server starting on port {}", port);
}

pub fn log_server_ready(port: u16) {
    info!("✅ Server ready and listening on http://0.0.0.0:{}", port);
}

pub fn log_health_check() {
    debug!("Health check requested");
}

pub fn log_tree_mounted(tree_id: &str, root_id: Option<&str>) {
    info!("🌳 Árvore montada: {} (raiz: {})", tree_id, root_id.unwrap_or("lista do site"));
}

pub fn log_tree_unmounted(tree_id: &str) {
    info!("🗑️ Árvore desmontada: {}", tree_id);
}

pub fn log_node_expand_failed(tree_id: &str, node_id: &str, error: &str) {
    warn!("⚠️ Falha ao expandir {} na árvore {}: {}", node_id, tree_id, error);
}

pub fn log_info(message: &str) {
    info!("{}", message);
}

pub fn log_warning(message: &str) {
    warn!("{}", message);
}
