// Serviços do painel: fonte de categorias e registro das árvores montadas
pub mod category_source;
pub mod tree_sessions;

pub use category_source::MercadoLivreSource;
pub use tree_sessions::{CategoryTree, TreeSession, TreeSessions};
