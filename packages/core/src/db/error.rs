//! Storage errors for the tree stores
//!
//! Every variant means the store did not complete the request. Inserts that
//! fail with any of them have been rolled back: no node row, no boundary
//! shift, no `children_count` bump and no names remain.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The database file could not be opened
    #[error("Cannot open tree database at {path}: {source}")]
    ConnectionFailed {
        path: PathBuf,
        source: libsql::Error,
    },

    /// Creating `nodes`, `node_names` or their indexes failed
    #[error("Tree schema setup failed: {0}")]
    InitializationFailed(String),

    #[error("No permission to create the tree database at {path}")]
    PermissionDenied { path: PathBuf },

    /// The directory holding the database file could not be created
    #[error("Cannot create database directory: {0}")]
    DirectoryCreationFailed(#[from] std::io::Error),

    /// Row decoding or driver failure without further context
    #[error("libsql error: {0}")]
    LibsqlError(#[from] libsql::Error),

    /// A read or a step of an insert failed; `context` names the step
    #[error("Tree query failed: {context}")]
    SqlExecutionError { context: String },

    /// `BEGIN IMMEDIATE` or `COMMIT` failed, so the insert did not happen
    #[error("Insert transaction failed: {context}")]
    TransactionFailed { context: String },

    /// A name was rejected: duplicate language for the node, or blank text
    #[error("Name rejected: {context}")]
    ConstraintViolation { context: String },
}

impl DatabaseError {
    pub fn connection_failed(path: PathBuf, source: libsql::Error) -> Self {
        Self::ConnectionFailed { path, source }
    }

    pub fn initialization_failed(msg: impl Into<String>) -> Self {
        Self::InitializationFailed(msg.into())
    }

    pub fn permission_denied(path: PathBuf) -> Self {
        Self::PermissionDenied { path }
    }

    pub fn sql_execution(context: impl Into<String>) -> Self {
        Self::SqlExecutionError {
            context: context.into(),
        }
    }

    pub fn transaction_failed(context: impl Into<String>) -> Self {
        Self::TransactionFailed {
            context: context.into(),
        }
    }

    pub fn constraint_violation(context: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            context: context.into(),
        }
    }
}
