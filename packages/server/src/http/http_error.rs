//! HTTP error handling
//!
//! Maps catalog errors onto status codes and the error envelope. Storage and
//! internal failures are logged in full but answered with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use nodetree_core::CatalogError;
use serde::Serialize;

pub const NODE_NOT_FOUND: &str = "NODE_NOT_FOUND";
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const INVALID_INPUT: &str = "INVALID_INPUT";
pub const STORAGE_FAILURE: &str = "STORAGE_FAILURE";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

const GENERIC_MESSAGE: &str = "Internal server error";

/// Error envelope returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpError {
    /// Always `"error"`
    pub status: &'static str,
    /// Machine-readable error code
    pub code: String,
    /// User-facing error message
    pub message: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status: "error",
            code: code.into(),
            message: message.into(),
        }
    }

    /// 400 for a query or path parameter that does not parse
    pub fn invalid_parameter(name: &str) -> Self {
        Self::new(
            format!("Invalid parameter value for '{}'", name),
            INVALID_INPUT,
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self.code.as_str() {
            NODE_NOT_FOUND => StatusCode::NOT_FOUND,
            INVALID_INPUT | VALIDATION_ERROR => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

impl From<CatalogError> for HttpError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { id } => {
                HttpError::new(format!("Node not found: {}", id), NODE_NOT_FOUND)
            }
            CatalogError::Validation(e) => HttpError::new(e.to_string(), VALIDATION_ERROR),
            CatalogError::StorageFailure(e) => {
                tracing::error!(error = %e, "Storage failure while handling request");
                HttpError::new(GENERIC_MESSAGE, STORAGE_FAILURE)
            }
            CatalogError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error while handling request");
                HttpError::new(GENERIC_MESSAGE, INTERNAL_ERROR)
            }
        }
    }
}
