//! Renderização da árvore em linhas planas (para JSON) e em texto indentado
//!
//! O percurso usa pilha explícita: a profundidade da taxonomia não é limitada.

use serde::Serialize;

use crate::controller::TreeSnapshot;
use crate::node::CategoryNode;

/// Controle de expandir/recolher exibido ao lado do nó
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Affordance {
    /// Folha conhecida: sem controle
    None,
    Collapsed,
    Expanded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeRow {
    pub depth: usize,
    pub id: String,
    pub name: String,
    pub affordance: Affordance,
    pub loading: bool,
    pub selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    Loading,
    Ready,
    Error,
}

/// Visão completa: com erro de carga das raízes ela substitui a árvore inteira
/// e oferece a ação de recarregar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeView {
    pub status: ViewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub retry: bool,
    pub selected: Option<String>,
    pub rows: Vec<TreeRow>,
}

fn affordance(snapshot: &TreeSnapshot, node: &CategoryNode) -> Affordance {
    let may_have_children = match snapshot.store.get(&node.id) {
        Some(children) => !children.is_empty(),
        // sem busca ainda: só some o controle se a listagem disse que é folha
        None => node.children_hint().unwrap_or(true),
    };

    if !may_have_children {
        Affordance::None
    } else if snapshot.expansion.is_expanded(&node.id) {
        Affordance::Expanded
    } else {
        Affordance::Collapsed
    }
}

/// Linhas visíveis em pré-ordem, respeitando a ordem original de raízes e filhos
pub fn render_rows(snapshot: &TreeSnapshot, selected: Option<&str>) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    let mut stack: Vec<(&CategoryNode, usize)> = snapshot.roots.iter().rev().map(|n| (n, 0)).collect();
    // ancestrais do nó corrente; evita laço infinito se um id reaparecer abaixo de si mesmo
    let mut path: Vec<&str> = Vec::new();

    while let Some((node, depth)) = stack.pop() {
        path.truncate(depth);
        if path.contains(&node.id.as_str()) {
            tracing::warn!("Ciclo na taxonomia em {}, subárvore omitida", node.id);
            continue;
        }
        path.push(node.id.as_str());

        let affordance = affordance(snapshot, node);
        rows.push(TreeRow {
            depth,
            id: node.id.clone(),
            name: node.name.clone(),
            affordance,
            loading: snapshot.loading.contains(&node.id),
            selected: selected == Some(node.id.as_str()),
            error: snapshot.node_errors.get(&node.id).cloned(),
        });

        if snapshot.expansion.is_expanded(&node.id) {
            if let Some(children) = snapshot.store.get(&node.id) {
                stack.extend(children.iter().rev().map(|c| (c, depth + 1)));
            }
        }
    }

    rows
}

pub fn render_view(snapshot: &TreeSnapshot, selected: Option<&str>) -> TreeView {
    let selected_owned = selected.map(str::to_string);

    if snapshot.root_loading {
        return TreeView {
            status: ViewStatus::Loading,
            error: None,
            retry: false,
            selected: selected_owned,
            rows: Vec::new(),
        };
    }

    if let Some(error) = &snapshot.root_error {
        return TreeView {
            status: ViewStatus::Error,
            error: Some(error.clone()),
            retry: true,
            selected: selected_owned,
            rows: Vec::new(),
        };
    }

    TreeView {
        status: ViewStatus::Ready,
        error: None,
        retry: false,
        selected: selected_owned,
        rows: render_rows(snapshot, selected),
    }
}

/// Texto indentado, dois espaços por nível
///
/// ```text
/// ▾ Celulares e Telefones (MLB1051)
///   ▸ Celulares e Smartphones (MLB1055) ⏳
///   · Peças (MLB417704) ◀
/// ```
pub fn render_text(view: &TreeView) -> String {
    match view.status {
        ViewStatus::Loading => return "Carregando categorias...\n".to_string(),
        ViewStatus::Error => {
            return format!(
                "Erro ao carregar categorias: {}\nUse \"recarregar\" para tentar de novo.\n",
                view.error.as_deref().unwrap_or("erro desconhecido")
            )
        }
        ViewStatus::Ready => {}
    }

    let mut out = String::new();
    for row in &view.rows {
        let marker = match row.affordance {
            Affordance::None => '·',
            Affordance::Collapsed => '▸',
            Affordance::Expanded => '▾',
        };
        out.push_str(&"  ".repeat(row.depth));
        out.push(marker);
        out.push(' ');
        out.push_str(&row.name);
        out.push_str(&format!(" ({})", row.id));
        if row.loading {
            out.push_str(" ⏳");
        }
        if row.selected {
            out.push_str(" ◀");
        }
        if let Some(error) = &row.error {
            out.push_str(&format!(" ⚠ {}", error));
        }
        out.push('\n');
    }
    out
}
