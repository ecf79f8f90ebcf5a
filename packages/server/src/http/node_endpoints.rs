//! Catalog endpoints
//!
//! # Endpoints
//!
//! - `GET /api/health` - Health check with node count
//! - `GET /api/nodes` - List every node in tree order, paginated
//! - `POST /api/nodes` - Create a root or child node
//! - `GET /api/nodes/:id` - Get a node by ID
//! - `GET /api/nodes/:id/children` - Direct children of a node, paginated
//! - `GET /api/nodes/:id/ancestors` - Path from the root down to the node's parent
//!
//! Listing endpoints accept `page` (0-based, default 0), `page_size`
//! (default 5, clamped to 1..=1000) and `language` (default `en`).

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::http::http_error::VALIDATION_ERROR;
use crate::http::{ApiResponse, AppState, HttpError};
use nodetree_core::{
    clamp_page_size, ChildrenPage, CreatedNode, NodeId, NodePage, NodeView, DEFAULT_LANGUAGE,
    DEFAULT_PAGE_SIZE,
};

/// Raw listing parameters
///
/// Kept as strings so a malformed number is answered with the error
/// envelope instead of axum's plain-text query rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    page: Option<String>,
    page_size: Option<String>,
    language: Option<String>,
}

/// Parsed listing parameters with defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub page: i64,
    pub page_size: usize,
    pub language: String,
}

impl ListQuery {
    pub fn parse(self) -> Result<ListParams, HttpError> {
        let page = parse_int("page", self.page)?.unwrap_or(0);
        let page_size = parse_int("page_size", self.page_size)?
            .map(clamp_page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let language = self
            .language
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        Ok(ListParams {
            page,
            page_size,
            language,
        })
    }
}

/// Language-only parameters for single-node endpoints
#[derive(Debug, Default, Deserialize)]
pub struct LanguageQuery {
    language: Option<String>,
}

impl LanguageQuery {
    fn language(&self) -> &str {
        self.language
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
    }
}

fn parse_int(name: &str, raw: Option<String>) -> Result<Option<i64>, HttpError> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| HttpError::invalid_parameter(name)),
    }
}

fn parse_node_id(raw: &str) -> Result<NodeId, HttpError> {
    raw.trim()
        .parse::<NodeId>()
        .map_err(|_| HttpError::invalid_parameter("id"))
}

/// Request body for node creation
#[derive(Debug, Deserialize)]
pub struct CreateNodeRequest {
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    /// `language -> text`; empty texts are skipped
    #[serde(default)]
    pub names: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub node_count: u64,
}

#[derive(Debug, Serialize)]
pub struct AncestorsResponse {
    pub node_id: NodeId,
    pub ancestors: Vec<NodeView>,
}

/// Health check endpoint
///
/// Touches the store, so a broken database shows up as a 500 here.
async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<HealthStatus>>, HttpError> {
    let node_count = state
        .catalog
        .store()
        .count_nodes()
        .await
        .map_err(nodetree_core::CatalogError::from)?;

    Ok(Json(ApiResponse::success(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        node_count,
    })))
}

/// List nodes
///
/// # Example
///
/// ```bash
/// curl "http://localhost:3001/api/nodes?page=0&page_size=10&language=it"
/// ```
async fn list_nodes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<NodePage>>, HttpError> {
    let params = query.parse()?;
    let page = state
        .catalog
        .list_nodes(params.page, params.page_size, &params.language)
        .await?;
    Ok(Json(ApiResponse::success(page)))
}

/// Create a node
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:3001/api/nodes \
///   -H "Content-Type: application/json" \
///   -d '{"parent_id": 1, "names": {"en": "Sales", "it": "Vendite"}}'
/// ```
async fn create_node(
    State(state): State<AppState>,
    body: Result<Json<CreateNodeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedNode>>), HttpError> {
    let Json(request) = body.map_err(|e| HttpError::new(e.body_text(), VALIDATION_ERROR))?;

    let created = state
        .catalog
        .create_node(request.parent_id, request.names)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Get a single node
async fn get_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LanguageQuery>,
) -> Result<Json<ApiResponse<NodeView>>, HttpError> {
    let id = parse_node_id(&id)?;
    let node = state.catalog.get_node(id, query.language()).await?;
    Ok(Json(ApiResponse::success(node)))
}

/// Direct children of a node
async fn get_children(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<ChildrenPage>>, HttpError> {
    let id = parse_node_id(&id)?;
    let params = query.parse()?;
    let page = state
        .catalog
        .search_children(id, params.page, params.page_size, &params.language)
        .await?;
    Ok(Json(ApiResponse::success(page)))
}

/// Ancestors of a node, outermost first
async fn get_ancestors(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LanguageQuery>,
) -> Result<Json<ApiResponse<AncestorsResponse>>, HttpError> {
    let id = parse_node_id(&id)?;
    let ancestors = state.catalog.ancestors(id, query.language()).await?;
    Ok(Json(ApiResponse::success(AncestorsResponse {
        node_id: id,
        ancestors,
    })))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/nodes", get(list_nodes).post(create_node))
        .route("/api/nodes/:id", get(get_node))
        .route("/api/nodes/:id/children", get(get_children))
        .route("/api/nodes/:id/ancestors", get(get_ancestors))
        .with_state(state)
}
