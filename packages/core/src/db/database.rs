//! Database Connection Management
//!
//! This module provides the database connection and schema initialization for
//! the libsql-backed tree store.
//!
//! # Schema
//!
//! - `nodes`: one row per tree node with its nested-set boundaries
//! - `node_names`: localized display names, unique per `(node_id, language)`,
//!   deleted together with their node
//!
//! # Connections
//!
//! Use `connect_with_timeout()` in async code. Every connection gets a 5 second
//! busy timeout so writers queue behind an in-flight insert instead of failing
//! with `SQLITE_BUSY`.

use crate::db::error::DatabaseError;
use libsql::{Builder, Database};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// How long a connection waits on a locked database, in milliseconds
const BUSY_TIMEOUT_MS: u32 = 5000;

/// Database service for managing libsql connection and schema
///
/// # Examples
///
/// ```no_run
/// use nodetree_core::db::DatabaseService;
/// use std::path::PathBuf;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let db_service = DatabaseService::new(PathBuf::from("./data/nodetree.db")).await?;
///     let conn = db_service.connect_with_timeout().await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseService {
    /// libsql database handle (wrapped in Arc for sharing)
    pub db: Arc<Database>,

    /// Path to the database file
    pub db_path: PathBuf,
}

impl DatabaseService {
    /// Open or create the database at `db_path` and initialize the schema.
    ///
    /// Creates the parent directory when missing. Schema creation is
    /// idempotent, so opening an existing database is safe.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory cannot be created, the
    /// connection fails, or schema initialization fails.
    pub async fn new(db_path: PathBuf) -> Result<Self, DatabaseError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::PermissionDenied {
                        DatabaseError::permission_denied(db_path.clone())
                    } else {
                        DatabaseError::DirectoryCreationFailed(e)
                    }
                })?;
            }
        }

        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| DatabaseError::connection_failed(db_path.clone(), e))?;

        let service = Self {
            db: Arc::new(db),
            db_path,
        };

        service.initialize_schema().await?;

        Ok(service)
    }

    /// Execute a PRAGMA statement
    ///
    /// PRAGMA statements may return rows, so they go through query() rather
    /// than execute().
    async fn execute_pragma(
        &self,
        conn: &libsql::Connection,
        pragma: &str,
    ) -> Result<(), DatabaseError> {
        let mut stmt = conn.prepare(pragma).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        let _ = stmt.query(()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        Ok(())
    }

    /// Create tables and indexes (idempotent)
    async fn initialize_schema(&self) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        // WAL lets readers keep a consistent snapshot while an insert is in flight
        self.execute_pragma(&conn, "PRAGMA journal_mode = WAL")
            .await?;
        self.execute_pragma(&conn, "PRAGMA foreign_keys = ON")
            .await?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS nodes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                lft INTEGER NOT NULL,
                rgt INTEGER NOT NULL,
                children_count INTEGER NOT NULL DEFAULT 0,
                CHECK (lft < rgt),
                CHECK (children_count >= 0)
            )",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::initialization_failed(format!("Failed to create nodes table: {}", e))
        })?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS node_names (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                node_id INTEGER NOT NULL,
                language TEXT NOT NULL,
                node_name TEXT NOT NULL,
                UNIQUE (node_id, language),
                CHECK (length(language) > 0),
                CHECK (length(node_name) > 0),
                FOREIGN KEY (node_id) REFERENCES nodes(id) ON DELETE CASCADE
            )",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::initialization_failed(format!(
                "Failed to create node_names table: {}",
                e
            ))
        })?;

        for (name, ddl) in [
            (
                "idx_nodes_lft",
                "CREATE INDEX IF NOT EXISTS idx_nodes_lft ON nodes(lft)",
            ),
            (
                "idx_nodes_rgt",
                "CREATE INDEX IF NOT EXISTS idx_nodes_rgt ON nodes(rgt)",
            ),
        ] {
            conn.execute(ddl, ()).await.map_err(|e| {
                DatabaseError::initialization_failed(format!(
                    "Failed to create index '{}': {}",
                    name, e
                ))
            })?;
        }

        debug!("Schema ready at {}", self.db_path.display());
        Ok(())
    }

    /// Get a raw connection to the database
    ///
    /// Prefer `connect_with_timeout()` in async code.
    pub fn connect(&self) -> Result<libsql::Connection, DatabaseError> {
        self.db.connect().map_err(DatabaseError::LibsqlError)
    }

    /// Get a connection with busy timeout and foreign keys configured
    pub async fn connect_with_timeout(&self) -> Result<libsql::Connection, DatabaseError> {
        let conn = self.connect()?;

        self.execute_pragma(&conn, &format!("PRAGMA busy_timeout = {}", BUSY_TIMEOUT_MS))
            .await?;
        // foreign_keys is per-connection in SQLite
        self.execute_pragma(&conn, "PRAGMA foreign_keys = ON")
            .await?;

        Ok(conn)
    }
}
