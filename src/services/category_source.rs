//! Adaptador: API de categorias do Mercado Livre como fonte da árvore

use arvore::{CategoryFetcher, CategoryNode, FetchError};
use mercadolivre::{MercadoLivreClient, MercadoLivreError};

use crate::utils::logging::log_mercadolivre_api_error;

#[derive(Debug, Clone)]
pub struct MercadoLivreSource {
    client: MercadoLivreClient,
}

impl MercadoLivreSource {
    pub fn new(client: MercadoLivreClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &MercadoLivreClient {
        &self.client
    }
}

fn to_fetch_error(endpoint: &str, err: MercadoLivreError) -> FetchError {
    log_mercadolivre_api_error(endpoint, err.status(), &err.to_string());
    FetchError::new(err.to_string())
}

impl CategoryFetcher for MercadoLivreSource {
    async fn root_categories(&self) -> Result<Vec<CategoryNode>, FetchError> {
        let categories = self
            .client
            .list_site_categories()
            .await
            .map_err(|e| to_fetch_error("list_site_categories", e))?;

        // a listagem do site não diz nada sobre filhos
        Ok(categories
            .into_iter()
            .map(|c| CategoryNode::new(c.id, c.name))
            .collect())
    }

    async fn category(&self, id: &str) -> Result<CategoryNode, FetchError> {
        let detail = self
            .client
            .get_category(id)
            .await
            .map_err(|e| to_fetch_error("get_category", e))?;

        let children = detail
            .children_categories
            .into_iter()
            .map(|c| CategoryNode::new(c.id, c.name))
            .collect();

        Ok(CategoryNode::with_children(detail.id, detail.name, children))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn source_for(server: &MockServer) -> MercadoLivreSource {
        MercadoLivreSource::new(MercadoLivreClient::new(server.base_url(), "MLB").unwrap())
    }

    #[tokio::test]
    async fn test_roots_have_unknown_children() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/sites/MLB/categories");
                then.status(200).json_body(json!([{"id": "MLB1051", "name": "Celulares e Telefones"}]));
            })
            .await;

        let roots = source_for(&server).root_categories().await.unwrap();
        assert_eq!(roots, vec![CategoryNode::new("MLB1051", "Celulares e Telefones")]);
        assert_eq!(roots[0].children_hint(), None);
    }

    #[tokio::test]
    async fn test_category_children_inline() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/categories/MLB1051");
                then.status(200).json_body(json!({
                    "id": "MLB1051",
                    "name": "Celulares e Telefones",
                    "children_categories": [{"id": "MLB1055", "name": "Celulares e Smartphones"}]
                }));
            })
            .await;

        let node = source_for(&server).category("MLB1051").await.unwrap();
        assert_eq!(
            node,
            CategoryNode::with_children(
                "MLB1051",
                "Celulares e Telefones",
                vec![CategoryNode::new("MLB1055", "Celulares e Smartphones")]
            )
        );
    }

    #[tokio::test]
    async fn test_api_failure_becomes_fetch_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/categories/MLB0");
                then.status(404).json_body(json!({"message": "Category not found", "status": 404}));
            })
            .await;

        let err = source_for(&server).category("MLB0").await.unwrap_err();
        assert!(err.message.contains("Category not found"));
    }
}
