//! Endpoints das árvores de categorias
//!
//! Cada gesto da UI vira um POST na visão montada; a resposta sempre traz a
//! visão renderizada para o cliente redesenhar.
//!
//! - `POST   /arvores`                                  monta (+ carga das raízes)
//! - `GET    /arvores/:tree_id[?formato=texto]`         visão atual
//! - `POST   /arvores/:tree_id/recarregar`              nova carga das raízes
//! - `POST   /arvores/:tree_id/nos/:node_id/alternar`   expandir/recolher
//! - `POST   /arvores/:tree_id/nos/:node_id/selecionar` seleção
//! - `POST   /arvores/:tree_id/expandir-tudo`
//! - `POST   /arvores/:tree_id/recolher-tudo`
//! - `DELETE /arvores/:tree_id`                         desmonta

use std::sync::Arc;

use arvore::TreeError;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::time::Instant;
use uuid::Uuid;

use crate::services::TreeSession;
use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MountRequest {
    pub root_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub formato: Option<String>,
}

async fn find_session(state: &AppState, tree_id: &Uuid) -> AppResult<Arc<TreeSession>> {
    state
        .sessions
        .get(tree_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("árvore {} não está montada", tree_id)))
}

async fn session_body(session: &TreeSession) -> Value {
    json!({
        "arvore_id": session.id,
        "root_id": session.root_id,
        "montada_em": session.created_at.to_rfc3339(),
        "arvore": session.view().await,
        "timestamp": chrono::Utc::now().to_rfc3339()
    })
}

async fn load_roots(session: &TreeSession) {
    if let Err(e) = session.controller.initialize(session.root_id.as_deref()).await {
        // a visão de erro (com retry) vai no corpo da resposta
        log_warning(&format!("❌ Árvore {}: {}", session.id, e));
    }
}

pub async fn mount_tree(
    State(state): State<Arc<AppState>>,
    body: Result<Json<MountRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let start_time = Instant::now();
    log_request_received("/arvores", "POST");

    // sem corpo = raiz padrão; corpo presente precisa ser JSON válido
    let requested = match body {
        Ok(Json(req)) => req.root_id,
        Err(JsonRejection::MissingJsonContentType(_)) => None,
        Err(rejection) => {
            log_warning(&format!("Corpo inválido em POST /arvores: {}", rejection.body_text()));
            return Err(AppError::ValidationError(rejection.body_text()));
        }
    };
    if matches!(&requested, Some(id) if id.trim().is_empty()) {
        return Err(AppError::ValidationError("root_id vazio".to_string()));
    }
    let root_id = requested.or_else(|| state.settings.arvore.default_root_id.clone());

    let session = state.sessions.mount(root_id).await;
    load_roots(&session).await;

    log_request_processed("/arvores", 201, start_time.elapsed().as_millis() as u64);
    Ok((StatusCode::CREATED, Json(session_body(&session).await)))
}

pub async fn get_tree(
    State(state): State<Arc<AppState>>,
    Path(tree_id): Path<Uuid>,
    Query(query): Query<ViewQuery>,
) -> AppResult<Response> {
    let session = find_session(&state, &tree_id).await?;

    if query.formato.as_deref() == Some("texto") {
        let text = arvore::render::render_text(&session.view().await);
        return Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text).into_response());
    }

    Ok(Json(session_body(&session).await).into_response())
}

pub async fn reload_tree(
    State(state): State<Arc<AppState>>,
    Path(tree_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    log_request_received("/arvores/:tree_id/recarregar", "POST");

    let session = find_session(&state, &tree_id).await?;
    load_roots(&session).await;

    Ok(Json(session_body(&session).await))
}

pub async fn toggle_node(
    State(state): State<Arc<AppState>>,
    Path((tree_id, node_id)): Path<(Uuid, String)>,
) -> AppResult<Json<Value>> {
    let session = find_session(&state, &tree_id).await?;

    let outcome = match session.controller.toggle_expand(&node_id).await {
        Ok(outcome) => json!(outcome),
        Err(e @ TreeError::NodeNotFound(_)) => return Err(e.into()),
        Err(e) => {
            // falha local: o nó volta a recolhido, o resto da árvore segue
            log_node_expand_failed(&tree_id.to_string(), &node_id, &e.to_string());
            json!({ "resultado": "failed", "aviso": e.to_string() })
        }
    };

    let mut body = session_body(&session).await;
    body["alternar"] = outcome;
    Ok(Json(body))
}

pub async fn expand_all(
    State(state): State<Arc<AppState>>,
    Path(tree_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let start_time = Instant::now();
    log_request_received("/arvores/:tree_id/expandir-tudo", "POST");

    let session = find_session(&state, &tree_id).await?;
    let report = session.controller.expand_all().await;

    let mut body = session_body(&session).await;
    body["expandir_tudo"] = json!(report);

    log_request_processed("/arvores/:tree_id/expandir-tudo", 200, start_time.elapsed().as_millis() as u64);
    Ok(Json(body))
}

pub async fn collapse_all(
    State(state): State<Arc<AppState>>,
    Path(tree_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let session = find_session(&state, &tree_id).await?;
    session.controller.collapse_all().await;

    Ok(Json(session_body(&session).await))
}

pub async fn select_node(
    State(state): State<Arc<AppState>>,
    Path((tree_id, node_id)): Path<(Uuid, String)>,
) -> AppResult<Json<Value>> {
    let session = find_session(&state, &tree_id).await?;
    let node = session.controller.select_by_id(&node_id).await?;

    let mut body = session_body(&session).await;
    body["selecionado"] = json!(node);
    Ok(Json(body))
}

pub async fn unmount_tree(
    State(state): State<Arc<AppState>>,
    Path(tree_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    log_request_received("/arvores/:tree_id", "DELETE");

    if !state.sessions.unmount(&tree_id).await {
        return Err(AppError::NotFound(format!("árvore {} não está montada", tree_id)));
    }

    Ok(Json(json!({
        "arvore_id": tree_id,
        "status": "desmontada",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use httpmock::prelude::*;
    use tower::ServiceExt;

    fn app_for(server: &MockServer) -> axum::Router {
        let mut settings = Settings::defaults().unwrap();
        settings.mercadolivre.base_url = server.base_url();
        let state = AppState::new(settings).unwrap();
        crate::build_router(Arc::new(state))
    }

    async fn call(app: &axum::Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn mock_celulares(server: &MockServer) {
        server
            .mock_async(|when, then| {
                when.method(GET).path("/categories/MLB1051");
                then.status(200).json_body(json!({
                    "id": "MLB1051",
                    "name": "Celulares e Telefones",
                    "children_categories": [
                        {"id": "MLB1055", "name": "Celulares e Smartphones"},
                        {"id": "MLB3813", "name": "Acessórios"}
                    ]
                }));
            })
            .await;
    }

    #[tokio::test]
    async fn test_mount_with_root_id() {
        let server = MockServer::start_async().await;
        mock_celulares(&server).await;
        let app = app_for(&server);

        let (status, body) = call(&app, Method::POST, "/arvores", Some(json!({"root_id": "MLB1051"}))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["arvore"]["status"], "ready");
        let rows = body["arvore"]["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["affordance"], "expanded");
        assert_eq!(rows[1]["id"], "MLB1055");
        assert_eq!(rows[1]["depth"], 1);
    }

    #[tokio::test]
    async fn test_mount_root_failure_returns_error_view() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/sites/MLB/categories");
                then.status(500).json_body(json!({"message": "internal_error"}));
            })
            .await;
        let app = app_for(&server);

        let (status, body) = call(&app, Method::POST, "/arvores", None).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["arvore"]["status"], "error");
        assert_eq!(body["arvore"]["retry"], true);
        assert!(body["arvore"]["rows"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_failure_is_local() {
        let server = MockServer::start_async().await;
        mock_celulares(&server).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/categories/MLB1055");
                then.status(503).body("indisponível");
            })
            .await;
        let acessorios = server
            .mock_async(|when, then| {
                when.method(GET).path("/categories/MLB3813");
                then.status(200).json_body(json!({
                    "id": "MLB3813",
                    "name": "Acessórios",
                    "children_categories": [{"id": "MLB7502", "name": "Capas"}]
                }));
            })
            .await;
        let app = app_for(&server);

        let (_, body) = call(&app, Method::POST, "/arvores", Some(json!({"root_id": "MLB1051"}))).await;
        let tree_id = body["arvore_id"].as_str().unwrap().to_string();

        let (status, body) = call(&app, Method::POST, &format!("/arvores/{tree_id}/nos/MLB1055/alternar"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["alternar"]["resultado"], "failed");
        let rows = body["arvore"]["rows"].as_array().unwrap();
        assert_eq!(rows[1]["affordance"], "collapsed");
        assert!(rows[1]["error"].as_str().unwrap().contains("indisponível"));

        let (_, body) = call(&app, Method::POST, &format!("/arvores/{tree_id}/nos/MLB3813/alternar"), None).await;
        assert_eq!(body["alternar"], json!({"resultado": "expanded", "fetched": true}));
        let rows = body["arvore"]["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3]["id"], "MLB7502");

        // recolher e expandir de novo não volta à API
        call(&app, Method::POST, &format!("/arvores/{tree_id}/recolher-tudo"), None).await;
        let (_, body) = call(&app, Method::POST, &format!("/arvores/{tree_id}/nos/MLB3813/alternar"), None).await;
        assert_eq!(body["alternar"]["fetched"], false);
        assert_eq!(acessorios.hits_async().await, 1);
    }

    #[tokio::test]
    async fn test_select_and_text_view() {
        let server = MockServer::start_async().await;
        mock_celulares(&server).await;
        let app = app_for(&server);

        let (_, body) = call(&app, Method::POST, "/arvores", Some(json!({"root_id": "MLB1051"}))).await;
        let tree_id = body["arvore_id"].as_str().unwrap().to_string();

        let (status, body) = call(&app, Method::POST, &format!("/arvores/{tree_id}/nos/MLB3813/selecionar"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selecionado"]["name"], "Acessórios");
        assert_eq!(body["arvore"]["selected"], "MLB3813");

        let (status, _) = call(&app, Method::POST, &format!("/arvores/{tree_id}/nos/MLB0/selecionar"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let request = Request::builder()
            .uri(format!("/arvores/{tree_id}?formato=texto"))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.starts_with("▾ Celulares e Telefones (MLB1051)\n"));
        assert!(text.contains("  ▸ Acessórios (MLB3813) ◀\n"));
    }

    #[tokio::test]
    async fn test_expand_all_and_unmount() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/sites/MLB/categories");
                then.status(200).json_body(json!([{"id": "MLB1051", "name": "Celulares e Telefones"}]));
            })
            .await;
        mock_celulares(&server).await;
        for id in ["MLB1055", "MLB3813"] {
            server
                .mock_async(|when, then| {
                    when.method(GET).path(format!("/categories/{id}"));
                    then.status(200).json_body(json!({"id": id, "name": id, "children_categories": []}));
                })
                .await;
        }
        let app = app_for(&server);

        let (_, body) = call(&app, Method::POST, "/arvores", None).await;
        let tree_id = body["arvore_id"].as_str().unwrap().to_string();
        assert_eq!(body["arvore"]["rows"][0]["affordance"], "collapsed");

        let (_, body) = call(&app, Method::POST, &format!("/arvores/{tree_id}/expandir-tudo"), None).await;
        assert_eq!(body["expandir_tudo"]["visited"], 3);
        assert_eq!(body["expandir_tudo"]["fetched"], 3);
        let rows = body["arvore"]["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1]["affordance"], "none");

        let (status, _) = call(&app, Method::DELETE, &format!("/arvores/{tree_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = call(&app, Method::GET, &format!("/arvores/{tree_id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
    }

    #[tokio::test]
    async fn test_malformed_mount_body_rejected() {
        let server = MockServer::start_async().await;
        let roots = server
            .mock_async(|when, then| {
                when.method(GET).path("/sites/MLB/categories");
                then.status(200).json_body(json!([]));
            })
            .await;
        let app = app_for(&server);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/arvores")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"root_id": 1051"#))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], 400);
        assert_eq!(roots.hits_async().await, 0);
        assert_eq!(call(&app, Method::GET, "/health", None).await.1["arvores_montadas"], 0);
    }

    #[tokio::test]
    async fn test_toggle_unknown_node_is_not_found() {
        let server = MockServer::start_async().await;
        mock_celulares(&server).await;
        let bogus = server
            .mock_async(|when, then| {
                when.method(GET).path_contains("/categories/BOGUS");
                then.status(200).json_body(json!({"id": "BOGUS", "name": "?", "children_categories": []}));
            })
            .await;
        let app = app_for(&server);

        let (_, body) = call(&app, Method::POST, "/arvores", Some(json!({"root_id": "MLB1051"}))).await;
        let tree_id = body["arvore_id"].as_str().unwrap().to_string();

        for i in 0..3 {
            let (status, body) =
                call(&app, Method::POST, &format!("/arvores/{tree_id}/nos/BOGUS{i}/alternar"), None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["status"], 404);
        }
        assert_eq!(bogus.hits_async().await, 0);

        let (_, body) = call(&app, Method::GET, &format!("/arvores/{tree_id}"), None).await;
        assert_eq!(body["arvore"]["rows"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_blank_root_id_rejected() {
        let server = MockServer::start_async().await;
        let app = app_for(&server);

        let (status, _) = call(&app, Method::POST, "/arvores", Some(json!({"root_id": " "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
