//! Database Layer
//!
//! This module handles persistence of the catalog tree:
//!
//! - [`TreeStore`] - the persistence boundary the catalog service depends on
//! - [`LibsqlStore`] - embedded libsql (SQLite-compatible) implementation
//! - [`MemoryStore`] - in-process implementation for tests and ephemeral servers
//! - [`DatabaseService`] - libsql connection and schema management

mod database;
mod error;
mod libsql_store;
mod memory_store;
mod tree_store;

pub use database::DatabaseService;
pub use error::DatabaseError;
pub use libsql_store::LibsqlStore;
pub use memory_store::MemoryStore;
pub use tree_store::{InsertOutcome, NodeContext, TreeStore};
