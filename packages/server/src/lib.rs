//! NodeTree HTTP Server
//!
//! Exposes the catalog operations of `nodetree-core` as a JSON REST API.
//!
//! - `config`: environment-driven runtime configuration
//! - `http`: axum router, endpoints and error envelope

pub mod config;
pub mod http;

pub use config::{ConfigError, ServerConfig, StoreBackend};
pub use http::{create_router, start_server, AppState, HttpError};
