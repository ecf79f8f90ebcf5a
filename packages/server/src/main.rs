//! NodeTree HTTP Server Binary
//!
//! # Usage
//!
//! ```bash
//! # Defaults: 127.0.0.1:3001, database at ~/.nodetree/database/nodetree.db
//! cargo run --bin nodetree-server
//!
//! # Throwaway in-memory catalog on another port
//! NODETREE_STORE=memory NODETREE_PORT=3002 cargo run --bin nodetree-server
//! ```
//!
//! # Environment Variables
//!
//! - `NODETREE_PORT`: Server port (default: 3001)
//! - `NODETREE_BIND`: Bind address (default: 127.0.0.1)
//! - `NODETREE_DB_PATH`: Database file (default: ~/.nodetree/database/nodetree.db)
//! - `NODETREE_STORE`: `libsql` or `memory` (default: libsql)
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use std::sync::Arc;

use nodetree_core::{CatalogService, LibsqlStore, MemoryStore, TreeStore};
use nodetree_server::{start_server, AppState, ServerConfig, StoreBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!("NodeTree server {}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn TreeStore> = match config.store {
        StoreBackend::Libsql => {
            tracing::info!("Database: {}", config.db_path.display());
            Arc::new(LibsqlStore::open(config.db_path.clone()).await?)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let catalog = Arc::new(CatalogService::new(store));

    // Refuse to serve a tree whose intervals are already inconsistent
    let report = catalog
        .verify_tree()
        .await
        .map_err(|e| anyhow::anyhow!("Tree verification failed: {}", e))?;
    tracing::info!(
        nodes = report.node_count,
        roots = report.root_count,
        "Tree verified"
    );

    start_server(AppState::new(catalog), config.socket_addr()).await
}
