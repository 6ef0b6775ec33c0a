/// Imprime a árvore de categorias do Mercado Livre no terminal
///
/// Execute com:
///   cargo run --bin arvore_categorias                       # raízes do site
///   cargo run --bin arvore_categorias -- MLB1051            # a partir de uma categoria
///   cargo run --bin arvore_categorias -- MLB1051 --expandir-tudo

use arvore::render::{render_text, render_view};
use arvore::TreeController;
use tracing_subscriber::EnvFilter;

use painel_suporte::config::Settings;
use painel_suporte::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let expand_all = args.iter().any(|a| a == "--expandir-tudo");
    let root_id = args.iter().find(|a| !a.starts_with("--")).cloned();

    let settings = Settings::new()?;
    let root_id = root_id.or_else(|| settings.arvore.default_root_id.clone());
    let limits = settings.arvore.limits();
    let state = AppState::new(settings)?;

    let controller = TreeController::new(painel_suporte::services::MercadoLivreSource::new(state.mercadolivre.clone()))
        .with_limits(limits);

    if let Err(e) = controller.initialize(root_id.as_deref()).await {
        eprintln!("❌ {}", e);
    }

    if expand_all {
        let report = controller.expand_all().await;
        eprintln!(
            "🌲 {} nós visitados, {} buscas, {} falhas",
            report.visited,
            report.fetched,
            report.failed.len()
        );
    }

    let view = render_view(&controller.snapshot().await, None);
    print!("{}", render_text(&view));

    Ok(())
}
