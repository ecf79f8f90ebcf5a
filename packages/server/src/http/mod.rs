//! HTTP layer for the catalog
//!
//! # Endpoints
//!
//! See [`node_endpoints`] for the route table. Every response body is a JSON
//! envelope: `{"status":"success","data":...}` on success and
//! `{"status":"error","code":...,"message":...}` on failure.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin nodetree-server
//! curl http://127.0.0.1:3001/api/health
//! ```

use axum::Router;
use nodetree_core::CatalogService;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

mod http_error;
pub mod node_endpoints;

pub use http_error::HttpError;

/// Application state shared across all endpoints
///
/// The catalog owns the store handle; handlers never reach the store
/// directly, so every request goes through the same validation and
/// transaction boundaries.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
}

impl AppState {
    pub fn new(catalog: Arc<CatalogService>) -> Self {
        Self { catalog }
    }
}

/// Success envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

/// Create the application router with request tracing
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(node_endpoints::routes(state))
        .layer(TraceLayer::new_for_http())
}

/// Bind `addr` and serve until the process is stopped
///
/// # Errors
///
/// Returns error if the listener cannot bind or the server fails.
pub async fn start_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
