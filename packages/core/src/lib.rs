//! NodeTree Core
//!
//! Hierarchical catalog of named entities stored as a nested-set interval tree.
//! Each node owns an integer interval `(left, right)`; ancestor, descendant and
//! sibling relationships are answered by interval comparison alone.
//!
//! # Modules
//!
//! - [`models`] - Data structures (TreeNode, Interval, names, views)
//! - [`tree`] - Nested-set engine: insert planning, direct-child filtering, invariants
//! - [`db`] - Persistence boundary with libsql and in-memory stores
//! - [`services`] - Catalog service, name resolution and pagination

pub mod db;
pub mod models;
pub mod services;
pub mod tree;

// Re-export commonly used types
pub use db::{DatabaseError, DatabaseService, LibsqlStore, MemoryStore, TreeStore};
pub use models::*;
pub use services::*;
