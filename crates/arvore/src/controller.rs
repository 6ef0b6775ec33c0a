//! Controlador da árvore de categorias
//!
//! Faz a mediação entre os gestos do usuário (expandir, recolher, expandir tudo,
//! recolher tudo, selecionar) e os dois mapas de estado:
//!
//! - [`NodeStore`]: filhos já buscados, sobrevive a qualquer recolhimento
//! - [`ExpansionState`]: o que está aberto agora, efêmero
//!
//! Garantias:
//! - no máximo uma busca em andamento por nó (conjunto `loading`)
//! - nós diferentes carregam em paralelo sem se bloquear
//! - o lock de estado nunca é mantido durante uma busca
//! - busca que termina depois de `unmount` (ou de uma nova `initialize`) é descartada

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{Result, TreeError};
use crate::expansion::ExpansionState;
use crate::fetcher::CategoryFetcher;
use crate::node::CategoryNode;
use crate::store::NodeStore;

/// Quantas raízes o "expandir tudo" percorre
pub const ROOT_FAN_OUT: usize = 5;
/// Quantos filhos de cada nó expandido o "expandir tudo" percorre
pub const CHILD_FAN_OUT: usize = 10;

/// Limites de leque do "expandir tudo" (limita as chamadas de rede por gesto)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanOutLimits {
    pub roots: usize,
    pub children: usize,
}

impl Default for FanOutLimits {
    fn default() -> Self {
        Self {
            roots: ROOT_FAN_OUT,
            children: CHILD_FAN_OUT,
        }
    }
}

/// Callback externo de seleção
pub type SelectCallback = Arc<dyn Fn(&CategoryNode) + Send + Sync>;

/// Estado de um nó na máquina `Unknown → Loading → {Loaded | Failed}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    Unknown,
    Loading,
    Loaded,
    Failed,
}

/// Resultado de um `toggle_expand`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "resultado")]
pub enum ToggleOutcome {
    /// Expandido; `fetched` indica se houve ida à rede
    Expanded { fetched: bool },
    Collapsed,
    /// Já existe busca em andamento para o nó; nada foi feito
    AlreadyLoading,
    /// A visão foi desmontada ou recarregada durante a busca
    Discarded,
}

/// Resumo de um `expand_all`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpandAllReport {
    pub visited: usize,
    pub fetched: usize,
    pub failed: Vec<String>,
    pub discarded: bool,
}

/// Cópia do estado para renderização
#[derive(Debug, Clone, Default)]
pub struct TreeSnapshot {
    pub roots: Vec<CategoryNode>,
    pub store: NodeStore,
    pub expansion: ExpansionState,
    pub loading: HashSet<String>,
    pub node_errors: HashMap<String, String>,
    pub root_loading: bool,
    pub root_error: Option<String>,
}

impl TreeSnapshot {
    pub fn node_state(&self, id: &str) -> NodeState {
        if self.loading.contains(id) {
            NodeState::Loading
        } else if self.store.contains(id) {
            NodeState::Loaded
        } else if self.node_errors.contains_key(id) {
            NodeState::Failed
        } else {
            NodeState::Unknown
        }
    }
}

#[derive(Debug, Default)]
struct TreeState {
    roots: Vec<CategoryNode>,
    store: NodeStore,
    expansion: ExpansionState,
    loading: HashSet<String>,
    node_errors: HashMap<String, String>,
    root_loading: bool,
    root_error: Option<String>,
    generation: u64,
}

impl TreeState {
    fn reset(&mut self) {
        self.roots.clear();
        self.store.clear();
        self.expansion.clear();
        self.loading.clear();
        self.node_errors.clear();
        self.root_loading = false;
        self.root_error = None;
        self.generation += 1;
    }

    fn find_node(&self, id: &str) -> Option<&CategoryNode> {
        self.roots
            .iter()
            .find(|n| n.id == id)
            .or_else(|| self.store.find_node(id))
    }
}

enum Children {
    Cached(Vec<CategoryNode>),
    InFlight,
    Fetch,
}

/// Controlador de uma árvore renderizada. Uma instância por visão montada.
pub struct TreeController<F> {
    fetcher: F,
    limits: FanOutLimits,
    on_select: Option<SelectCallback>,
    mounted: AtomicBool,
    state: RwLock<TreeState>,
}

impl<F: CategoryFetcher> TreeController<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            limits: FanOutLimits::default(),
            on_select: None,
            mounted: AtomicBool::new(true),
            state: RwLock::new(TreeState::default()),
        }
    }

    pub fn with_limits(mut self, limits: FanOutLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_select_callback(mut self, callback: SelectCallback) -> Self {
        self.on_select = Some(callback);
        self
    }

    pub fn limits(&self) -> FanOutLimits {
        self.limits
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    fn is_current(&self, state: &TreeState, generation: u64) -> bool {
        self.is_mounted() && state.generation == generation
    }

    /// Carrega o conjunto de raízes
    ///
    /// Com `root_id`: busca a categoria, usa como raiz única, já expandida e com
    /// os filhos inline no cache. Sem `root_id`: busca a lista de raízes, nada
    /// expandido. Chamar de novo recomeça do zero (é o "recarregar").
    pub async fn initialize(&self, root_id: Option<&str>) -> Result<()> {
        let generation = {
            let mut state = self.state.write().await;
            if !self.is_mounted() {
                tracing::debug!("Árvore desmontada, initialize ignorado");
                return Ok(());
            }
            state.reset();
            state.root_loading = true;
            state.generation
        };

        tracing::info!("🌳 Carregando raízes da árvore (root_id: {:?})", root_id);

        let result = match root_id {
            Some(id) => self.fetcher.category(id).await.map(|node| vec![node]),
            None => self.fetcher.root_categories().await,
        };

        let mut state = self.state.write().await;
        if !self.is_current(&state, generation) {
            tracing::debug!("Carga de raízes descartada (visão desmontada ou recarregada)");
            return Ok(());
        }
        state.root_loading = false;

        match result {
            Ok(roots) => {
                if root_id.is_some() {
                    if let Some(root) = roots.first() {
                        let children = root.children.clone().unwrap_or_default();
                        tracing::info!("✅ Raiz '{}' carregada com {} filhos", root.name, children.len());
                        state.store.insert(root.id.clone(), children);
                        state.expansion.set(root.id.clone(), true);
                    }
                } else {
                    tracing::info!("✅ {} categorias raiz carregadas", roots.len());
                }
                state.roots = roots;
                Ok(())
            }
            Err(e) => {
                tracing::error!("❌ Falha ao carregar raízes: {}", e);
                state.root_error = Some(e.message.clone());
                Err(TreeError::RootLoad(e))
            }
        }
    }

    /// Alterna expandido/recolhido de um nó
    ///
    /// Só nós presentes na árvore carregada (raízes ou filhos em cache) podem
    /// ser alternados. Expandir sem cache dispara a busca dos filhos; em caso
    /// de falha o nó volta a recolhido e o erro fica registrado para a
    /// renderização. Recolher nunca busca nada.
    pub async fn toggle_expand(&self, id: &str) -> Result<ToggleOutcome> {
        let generation = {
            let mut state = self.state.write().await;
            if !self.is_mounted() {
                return Ok(ToggleOutcome::Discarded);
            }
            if state.loading.contains(id) {
                tracing::debug!("Busca de {} já em andamento, toggle ignorado", id);
                return Ok(ToggleOutcome::AlreadyLoading);
            }
            if state.find_node(id).is_none() {
                tracing::debug!("Categoria {} não está na árvore, toggle recusado", id);
                return Err(TreeError::NodeNotFound(id.to_string()));
            }

            if !state.expansion.toggle(id) {
                return Ok(ToggleOutcome::Collapsed);
            }

            state.node_errors.remove(id);
            if state.store.contains(id) {
                return Ok(ToggleOutcome::Expanded { fetched: false });
            }

            state.loading.insert(id.to_string());
            state.generation
        };

        tracing::debug!("📡 Buscando filhos de {}", id);
        let result = self.fetcher.category(id).await;

        let mut state = self.state.write().await;
        if !self.is_current(&state, generation) {
            tracing::debug!("Resultado de {} descartado (visão desmontada ou recarregada)", id);
            return Ok(ToggleOutcome::Discarded);
        }
        state.loading.remove(id);

        match result {
            Ok(node) => {
                let children = node.children.unwrap_or_default();
                tracing::debug!("✅ {} filhos de {} em cache", children.len(), id);
                state.store.insert(id.to_string(), children);
                Ok(ToggleOutcome::Expanded { fetched: true })
            }
            Err(e) => {
                tracing::warn!("⚠️ Falha ao expandir {}: {}", id, e);
                state.expansion.set(id.to_string(), false);
                state.node_errors.insert(id.to_string(), e.message.clone());
                Err(TreeError::NodeExpand {
                    id: id.to_string(),
                    source: e,
                })
            }
        }
    }

    /// Expande em profundidade tudo que é alcançável a partir das raízes
    ///
    /// Percorre no máximo `limits.roots` raízes e, em cada nó expandido, no
    /// máximo `limits.children` filhos. Falha de busca deixa a subárvore vazia
    /// e o percurso continua.
    pub async fn expand_all(&self) -> ExpandAllReport {
        let mut report = ExpandAllReport::default();

        let (mut stack, generation) = {
            let state = self.state.read().await;
            if !self.is_mounted() {
                report.discarded = true;
                return report;
            }
            let roots: Vec<CategoryNode> = state
                .roots
                .iter()
                .take(self.limits.roots)
                .rev()
                .cloned()
                .collect();
            (roots, state.generation)
        };

        tracing::info!("🌲 Expandindo tudo a partir de {} raízes", stack.len());

        let mut visited: HashSet<String> = HashSet::new();

        while let Some(node) = stack.pop() {
            if !visited.insert(node.id.clone()) {
                continue;
            }
            report.visited += 1;

            let lookup = {
                let mut state = self.state.write().await;
                if !self.is_current(&state, generation) {
                    report.discarded = true;
                    return report;
                }
                state.expansion.set(node.id.clone(), true);
                if let Some(children) = state.store.get(&node.id) {
                    Children::Cached(children.to_vec())
                } else if state.loading.contains(&node.id) {
                    Children::InFlight
                } else {
                    state.loading.insert(node.id.clone());
                    Children::Fetch
                }
            };

            let children = match lookup {
                Children::Cached(children) => children,
                // a busca em andamento preenche o cache; não há o que descer agora
                Children::InFlight => continue,
                Children::Fetch => {
                    let result = self.fetcher.category(&node.id).await;

                    let mut state = self.state.write().await;
                    if !self.is_current(&state, generation) {
                        report.discarded = true;
                        return report;
                    }
                    state.loading.remove(&node.id);

                    match result {
                        Ok(fetched) => {
                            report.fetched += 1;
                            let children = fetched.children.unwrap_or_default();
                            state.node_errors.remove(&node.id);
                            state.store.insert(node.id.clone(), children.clone());
                            children
                        }
                        Err(e) => {
                            tracing::warn!("⚠️ Expandir tudo: falha em {} ({}), subárvore vazia", node.id, e);
                            state.node_errors.insert(node.id.clone(), e.message);
                            report.failed.push(node.id.clone());
                            Vec::new()
                        }
                    }
                }
            };

            stack.extend(children.into_iter().take(self.limits.children).rev());
        }

        tracing::info!(
            "✅ Expandir tudo: {} nós visitados, {} buscas, {} falhas",
            report.visited,
            report.fetched,
            report.failed.len()
        );
        report
    }

    /// Recolhe tudo. O cache de filhos é mantido.
    pub async fn collapse_all(&self) {
        let mut state = self.state.write().await;
        state.expansion.clear();
        tracing::debug!("Árvore recolhida ({} entradas de cache mantidas)", state.store.len());
    }

    /// Repassa o nó escolhido ao callback externo de seleção
    pub fn select(&self, node: &CategoryNode) {
        tracing::debug!("Categoria selecionada: {} ({})", node.name, node.id);
        if let Some(callback) = &self.on_select {
            callback(node);
        }
    }

    /// Seleciona pelo id um nó presente na árvore carregada
    pub async fn select_by_id(&self, id: &str) -> Result<CategoryNode> {
        let node = self
            .find_node(id)
            .await
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?;
        self.select(&node);
        Ok(node)
    }

    pub async fn find_node(&self, id: &str) -> Option<CategoryNode> {
        self.state.read().await.find_node(id).cloned()
    }

    pub async fn snapshot(&self) -> TreeSnapshot {
        let state = self.state.read().await;
        TreeSnapshot {
            roots: state.roots.clone(),
            store: state.store.clone(),
            expansion: state.expansion.clone(),
            loading: state.loading.clone(),
            node_errors: state.node_errors.clone(),
            root_loading: state.root_loading,
            root_error: state.root_error.clone(),
        }
    }

    /// Desmonta a visão: libera o estado e descarta buscas ainda em andamento
    pub async fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
        let mut state = self.state.write().await;
        state.reset();
        tracing::debug!("Árvore desmontada");
    }
}
