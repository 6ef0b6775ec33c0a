use serde::{Deserialize, Serialize};

/// Nó da taxonomia de categorias
///
/// `children` diz o que a listagem de origem sabia sobre os filhos:
/// - `None`: nada (ainda não buscado, pode ter filhos)
/// - `Some(vec![])`: folha conhecida
/// - `Some(filhos)`: filhos imediatos vieram inline
///
/// O nó é imutável depois de armazenado; filhos buscados depois vão para o
/// [`NodeStore`](crate::store::NodeStore), nunca para este campo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<CategoryNode>>,
}

impl CategoryNode {
    /// Nó vindo de uma listagem, sem informação sobre filhos
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: None,
        }
    }

    /// Nó com filhos imediatos conhecidos
    pub fn with_children(id: impl Into<String>, name: impl Into<String>, children: Vec<CategoryNode>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: Some(children),
        }
    }

    /// `Some(true)` se a listagem indicou filhos, `Some(false)` se indicou folha,
    /// `None` se não disse nada
    pub fn children_hint(&self) -> Option<bool> {
        self.children.as_ref().map(|c| !c.is_empty())
    }
}
