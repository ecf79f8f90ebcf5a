//! Service Layer Error Types
//!
//! Caller-facing error taxonomy of the catalog: not found, validation,
//! storage failure and internal error.

use crate::db::DatabaseError;
use crate::models::{NodeId, ValidationError};
use crate::tree::InvariantViolation;
use thiserror::Error;

/// Catalog operation errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Referenced node does not exist
    #[error("Node not found: {id}")]
    NotFound { id: NodeId },

    /// Malformed or empty required input
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The store could not complete an operation; any partial write was rolled back
    #[error("Storage failure: {0}")]
    StorageFailure(#[from] DatabaseError),

    /// Anything else that should not happen
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// Create a not found error
    pub fn not_found(id: NodeId) -> Self {
        Self::NotFound { id }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<InvariantViolation> for CatalogError {
    fn from(violation: InvariantViolation) -> Self {
        Self::Internal(format!("Tree invariant violated: {}", violation))
    }
}
