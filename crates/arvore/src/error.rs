//! Tipos de erro para o crate arvore

use thiserror::Error;

use crate::fetcher::FetchError;

/// Erros da árvore de categorias
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A carga inicial (lista de raízes ou raiz por id) falhou
    #[error("Falha ao carregar categorias raiz: {0}")]
    RootLoad(#[source] FetchError),

    /// A busca dos filhos de um nó falhou
    #[error("Falha ao expandir categoria {id}: {source}")]
    NodeExpand {
        id: String,
        #[source]
        source: FetchError,
    },

    /// Nó não está na árvore carregada
    #[error("Categoria não encontrada na árvore: {0}")]
    NodeNotFound(String),
}

/// Tipo Result padrão para o crate
pub type Result<T> = std::result::Result<T, TreeError>;
