//! Endpoints de categorias
//!
//! - `GET /sites/{site_id}/categories` → categorias raiz do site (só `id` e `name`)
//! - `GET /categories/{id}` → a categoria com os filhos imediatos em `children_categories`

use crate::client::MercadoLivreClient;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Deserializa ID que pode vir como string ou integer da API
fn deserialize_id_flexible<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(de::Error::custom("id must be string or number")),
    }
}

/// Entrada da listagem de categorias raiz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteCategory {
    #[serde(deserialize_with = "deserialize_id_flexible")]
    pub id: String,
    pub name: String,
}

/// Filho imediato retornado inline em `/categories/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildCategory {
    #[serde(deserialize_with = "deserialize_id_flexible")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub total_items_in_this_category: Option<u64>,
}

/// Ancestral no caminho até a raiz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathEntry {
    #[serde(deserialize_with = "deserialize_id_flexible")]
    pub id: String,
    pub name: String,
}

/// Detalhe de uma categoria
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDetail {
    #[serde(deserialize_with = "deserialize_id_flexible")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub path_from_root: Vec<PathEntry>,
    #[serde(default)]
    pub children_categories: Vec<ChildCategory>,
    #[serde(default)]
    pub total_items_in_this_category: Option<u64>,
}

impl MercadoLivreClient {
    /// Lista as categorias raiz do site configurado
    pub async fn list_site_categories(&self) -> Result<Vec<SiteCategory>> {
        let endpoint = format!("/sites/{}/categories", urlencoding::encode(self.site_id()));
        let categories: Vec<SiteCategory> = self.get_json(&endpoint).await?;

        tracing::debug!("📂 {} categorias raiz em {}", categories.len(), self.site_id());
        Ok(categories)
    }

    /// Busca uma categoria com seus filhos imediatos
    pub async fn get_category(&self, category_id: &str) -> Result<CategoryDetail> {
        let endpoint = format!("/categories/{}", urlencoding::encode(category_id));
        let detail: CategoryDetail = self.get_json(&endpoint).await?;

        tracing::debug!(
            "📂 Categoria {} ('{}') com {} filhos",
            detail.id,
            detail.name,
            detail.children_categories.len()
        );
        Ok(detail)
    }
}
