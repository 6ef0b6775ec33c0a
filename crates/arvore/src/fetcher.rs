//! Contrato do serviço remoto de categorias

use std::future::Future;

use thiserror::Error;

use crate::node::CategoryNode;

/// Falha opaca de busca: rede, status não-2xx ou corpo inválido
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("falha ao buscar categorias: {message}")]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Fonte de categorias consumida pelo [`TreeController`](crate::controller::TreeController)
pub trait CategoryFetcher: Send + Sync {
    /// Categorias raiz, em ordem (filhos omitidos ou vazios)
    fn root_categories(&self) -> impl Future<Output = Result<Vec<CategoryNode>, FetchError>> + Send;

    /// A categoria com os filhos imediatos inline em `children`
    fn category(&self, id: &str) -> impl Future<Output = Result<CategoryNode, FetchError>> + Send;
}
