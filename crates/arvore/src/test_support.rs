//! Fonte de categorias roteirizada para os testes do crate

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::fetcher::{CategoryFetcher, FetchError};
use crate::node::CategoryNode;

/// Trava uma busca até o teste liberar
#[derive(Clone, Default)]
pub struct Gate {
    pub started: Arc<Notify>,
    pub release: Arc<Notify>,
}

#[derive(Default)]
pub struct ScriptedFetcher {
    roots: Mutex<Option<Result<Vec<CategoryNode>, FetchError>>>,
    categories: Mutex<HashMap<String, Result<CategoryNode, FetchError>>>,
    gates: Mutex<HashMap<String, Gate>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roots(self, roots: Vec<CategoryNode>) -> Self {
        self.set_roots(Ok(roots));
        self
    }

    pub fn with_roots_error(self, message: &str) -> Self {
        self.set_roots(Err(FetchError::new(message)));
        self
    }

    pub fn with_category(self, id: impl Into<String>, node: CategoryNode) -> Self {
        self.set_category(id, Ok(node));
        self
    }

    pub fn with_category_error(self, id: impl Into<String>, message: &str) -> Self {
        self.set_category(id, Err(FetchError::new(message)));
        self
    }

    pub fn set_roots(&self, result: Result<Vec<CategoryNode>, FetchError>) {
        *self.roots.lock().unwrap() = Some(result);
    }

    pub fn set_category(&self, id: impl Into<String>, result: Result<CategoryNode, FetchError>) {
        self.categories.lock().unwrap().insert(id.into(), result);
    }

    pub fn gate(&self, id: &str) -> Gate {
        let gate = Gate::default();
        self.gates.lock().unwrap().insert(id.to_string(), gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }
}

impl CategoryFetcher for ScriptedFetcher {
    async fn root_categories(&self) -> Result<Vec<CategoryNode>, FetchError> {
        self.calls.lock().unwrap().push("roots".to_string());
        self.roots
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(FetchError::new("roots not scripted")))
    }

    async fn category(&self, id: &str) -> Result<CategoryNode, FetchError> {
        self.calls.lock().unwrap().push(format!("category:{id}"));

        let gate = self.gates.lock().unwrap().get(id).cloned();
        if let Some(gate) = gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }

        let scripted = self.categories.lock().unwrap().get(id).cloned();
        scripted.unwrap_or_else(|| Err(FetchError::new(format!("404 {id}"))))
    }
}
