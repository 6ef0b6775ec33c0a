use std::collections::HashMap;

/// Estado expandido/recolhido por id, separado do cache de filhos
#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    flags: HashMap<String, bool>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.flags.get(id).copied().unwrap_or(false)
    }

    /// Valor registrado para o id (`None` se nunca foi tocado)
    pub fn get(&self, id: &str) -> Option<bool> {
        self.flags.get(id).copied()
    }

    pub fn set(&mut self, id: impl Into<String>, expanded: bool) {
        self.flags.insert(id.into(), expanded);
    }

    /// Inverte e retorna o novo valor
    pub fn toggle(&mut self, id: &str) -> bool {
        let next = !self.is_expanded(id);
        self.flags.insert(id.to_string(), next);
        next
    }

    pub fn clear(&mut self) {
        self.flags.clear();
    }

    pub fn expanded_ids(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().filter(|(_, v)| **v).map(|(k, _)| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_clear() {
        let mut state = ExpansionState::new();
        assert!(!state.is_expanded("MLB1"));
        assert_eq!(state.get("MLB1"), None);

        assert!(state.toggle("MLB1"));
        assert!(!state.toggle("MLB1"));
        assert_eq!(state.get("MLB1"), Some(false));

        state.set("MLB2", true);
        assert_eq!(state.expanded_ids().collect::<Vec<_>>(), vec!["MLB2"]);

        state.clear();
        assert!(state.is_empty());
    }
}
