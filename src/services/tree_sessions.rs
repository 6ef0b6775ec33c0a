//! Registro das árvores montadas
//!
//! Cada visão do painel monta sua própria árvore (cache, expansão e seleção
//! exclusivos); nada é compartilhado entre visões. Desmontar libera o estado e
//! faz com que buscas ainda pendentes sejam descartadas.
//!
//! Visões sem acesso há mais de `idle_ttl` são desmontadas na próxima montagem
//! (aba fechada sem DELETE).

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use arvore::render::{render_view, TreeView};
use arvore::{CategoryNode, FanOutLimits, TreeController};
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::services::category_source::MercadoLivreSource;
use crate::utils::logging::{log_info, log_tree_mounted, log_tree_unmounted};

pub type CategoryTree = TreeController<MercadoLivreSource>;

/// Uma visão montada
pub struct TreeSession {
    pub id: Uuid,
    pub root_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub controller: CategoryTree,
    selection: Arc<std::sync::RwLock<Option<String>>>,
    last_access_ms: AtomicI64,
}

impl TreeSession {
    /// Id do nó selecionado (alvo do callback de seleção)
    pub fn selected(&self) -> Option<String> {
        self.selection.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last_access(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.last_access_ms.load(Ordering::Relaxed)).unwrap_or(self.created_at)
    }

    fn touch(&self, now: DateTime<Utc>) {
        self.last_access_ms.store(now.timestamp_millis(), Ordering::Relaxed);
    }

    pub async fn view(&self) -> TreeView {
        let snapshot = self.controller.snapshot().await;
        render_view(&snapshot, self.selected().as_deref())
    }
}

#[derive(Clone)]
pub struct TreeSessions {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<TreeSession>>>>,
    source: MercadoLivreSource,
    limits: FanOutLimits,
    idle_ttl: Duration,
}

impl TreeSessions {
    pub fn new(source: MercadoLivreSource, limits: FanOutLimits, idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            source,
            limits,
            idle_ttl,
        }
    }

    /// Monta uma visão nova (ainda sem raízes; chame `initialize` no controlador)
    pub async fn mount(&self, root_id: Option<String>) -> Arc<TreeSession> {
        self.evict_idle(Utc::now()).await;

        let id = Uuid::new_v4();
        let selection: Arc<std::sync::RwLock<Option<String>>> = Arc::new(std::sync::RwLock::new(None));

        let sink = selection.clone();
        let controller = TreeController::new(self.source.clone())
            .with_limits(self.limits)
            .with_select_callback(Arc::new(move |node: &CategoryNode| {
                *sink.write().unwrap_or_else(|e| e.into_inner()) = Some(node.id.clone());
            }));

        let now = Utc::now();
        let session = Arc::new(TreeSession {
            id,
            root_id,
            created_at: now,
            controller,
            selection,
            last_access_ms: AtomicI64::new(now.timestamp_millis()),
        });

        self.sessions.write().await.insert(id, session.clone());
        log_tree_mounted(&id.to_string(), session.root_id.as_deref());
        session
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<TreeSession>> {
        let session = self.sessions.read().await.get(id).cloned()?;
        session.touch(Utc::now());
        Some(session)
    }

    /// Desmonta as visões sem acesso desde `now - idle_ttl`; retorna quantas saíram
    pub async fn evict_idle(&self, now: DateTime<Utc>) -> usize {
        let expired: Vec<Arc<TreeSession>> = {
            let mut sessions = self.sessions.write().await;
            let ids: Vec<Uuid> = sessions
                .values()
                .filter(|s| now - s.last_access() > self.idle_ttl)
                .map(|s| s.id)
                .collect();
            ids.iter().filter_map(|id| sessions.remove(id)).collect()
        };

        for session in &expired {
            session.controller.unmount().await;
            log_tree_unmounted(&session.id.to_string());
        }
        if !expired.is_empty() {
            log_info(&format!("🧹 {} árvores ociosas desmontadas", expired.len()));
        }
        expired.len()
    }

    /// Remove a visão; retorna `false` se ela não existia
    pub async fn unmount(&self, id: &Uuid) -> bool {
        let removed = self.sessions.write().await.remove(id);
        match removed {
            Some(session) => {
                session.controller.unmount().await;
                log_tree_unmounted(&id.to_string());
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
