//! Árvore de categorias com carregamento sob demanda
//!
//! - [`NodeStore`]: cache `id → filhos`, preenchido só por buscas bem-sucedidas
//! - [`ExpansionState`]: `id → expandido`, limpo pelo "recolher tudo"
//! - [`TreeController`]: expandir/recolher, expandir tudo com leque limitado,
//!   recolher tudo, seleção
//! - [`render`]: linhas indentadas para a UI (JSON ou texto)
//!
//! A fonte remota entra pelo trait [`CategoryFetcher`].
//!
//! ```rust,ignore
//! let controller = TreeController::new(fonte);
//! controller.initialize(Some("MLB1051")).await?;
//! controller.toggle_expand("MLB1055").await?;
//! let view = render::render_view(&controller.snapshot().await, None);
//! print!("{}", render::render_text(&view));
//! ```

pub mod controller;
pub mod error;
pub mod expansion;
pub mod fetcher;
pub mod node;
pub mod render;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use controller::{
    ExpandAllReport, FanOutLimits, NodeState, SelectCallback, ToggleOutcome, TreeController, TreeSnapshot,
    CHILD_FAN_OUT, ROOT_FAN_OUT,
};
pub use error::{Result, TreeError};
pub use expansion::ExpansionState;
pub use fetcher::{CategoryFetcher, FetchError};
pub use node::CategoryNode;
pub use render::{Affordance, TreeRow, TreeView, ViewStatus};
pub use store::NodeStore;
