//! Data Models
//!
//! This module contains the core data structures used throughout NodeTree:
//!
//! - `TreeNode` - A persisted node with its nested-set boundaries
//! - `Interval` - The `(left, right)` pair every node occupies
//! - `NodeName` / `NewNodeNames` - Localized display names
//! - `NodeView` - The caller-facing shape returned by the catalog service

mod name;
mod node;
mod view;

pub use name::{NewNodeNames, NodeName};
pub use node::{Bounded, Interval, NodeId, TreeNode, ValidationError};
pub use view::{CreatedNode, NodeView};
