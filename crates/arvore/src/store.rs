use std::collections::HashMap;

use crate::node::CategoryNode;

/// Cache de filhos já buscados: `id → filhos`
///
/// Só recebe entradas de buscas bem-sucedidas e nunca remove nada enquanto a
/// visão estiver montada. Se um id é chave, a lista é definitiva e não será
/// buscada de novo.
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    children: HashMap<String, Vec<CategoryNode>>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&[CategoryNode]> {
        self.children.get(id).map(Vec::as_slice)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.children.contains_key(id)
    }

    /// Armazena os filhos de `id`. Uma entrada existente é mantida.
    pub fn insert(&mut self, id: impl Into<String>, children: Vec<CategoryNode>) -> bool {
        match self.children.entry(id.into()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(children);
                true
            }
        }
    }

    /// Procura um nó já carregado (como filho de alguém) pelo id
    pub fn find_node(&self, id: &str) -> Option<&CategoryNode> {
        self.children.values().flatten().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.children.clear();
    }
}
