//! TreeStore Trait - Persistence Boundary
//!
//! This module defines the `TreeStore` trait that abstracts storage of tree
//! nodes and their names. The catalog service only ever talks to this trait,
//! so backends can be swapped without touching business logic.
//!
//! # Contract
//!
//! - `insert_node` is the only write. It must apply the parent lookup, the
//!   `children_count` increment, the boundary shift, the new row and its names
//!   as one atomic, serialised unit. Concurrent readers see either the state
//!   before the insert or the state after it.
//! - Read methods never block on each other and return rows ordered by `left`.
//! - `locate` and `subtree` return a node together with its surroundings from
//!   a single snapshot. Anything that combines a node's boundaries with other
//!   rows must go through them, never through two separate reads.
//!
//! # Examples
//!
//! ```rust,no_run
//! use nodetree_core::db::{DatabaseService, InsertOutcome, LibsqlStore, TreeStore};
//! use nodetree_core::models::NewNodeNames;
//! use std::sync::Arc;
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let db = Arc::new(DatabaseService::new(PathBuf::from("./data/nodetree.db")).await?);
//!     let store: Arc<dyn TreeStore> = Arc::new(LibsqlStore::new(db));
//!
//!     let names = NewNodeNames::from_entries(vec![("en".into(), "Company".into())]);
//!     if let InsertOutcome::Created { node, level } = store.insert_node(None, &names).await? {
//!         println!("root spans ({}, {}) at level {}", node.left, node.right, level);
//!     }
//!     Ok(())
//! }
//! ```

use crate::db::DatabaseError;
use crate::models::{Interval, NewNodeNames, NodeId, NodeName, TreeNode};
use async_trait::async_trait;

/// A node and the rows around it, read from one consistent snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeContext {
    pub node: TreeNode,
    /// Nodes strictly containing `node`, outermost first
    pub ancestors: Vec<TreeNode>,
    /// Nodes strictly inside `node`, ordered by `left`; empty from `locate`
    pub descendants: Vec<TreeNode>,
}

impl NodeContext {
    /// Split rows that all contain or lie inside node `id` into a context.
    ///
    /// `rows` must be ordered by `left` and include the node itself;
    /// `None` when it does not.
    pub fn from_rows(id: NodeId, rows: Vec<TreeNode>) -> Option<Self> {
        let node = rows.iter().find(|n| n.id == id)?.clone();
        let (descendants, ancestors): (Vec<TreeNode>, Vec<TreeNode>) = rows
            .into_iter()
            .filter(|n| n.id != id)
            .partition(|n| node.contains(n));
        Some(Self {
            node,
            ancestors,
            descendants,
        })
    }

    /// Number of ancestors; roots are level 0
    pub fn level(&self) -> usize {
        self.ancestors.len()
    }
}

/// Result of an insert attempt that did not hit a storage failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Node and names committed. `level` is the ancestor count inside the
    /// insert transaction, so no later read is needed to report it.
    Created { node: TreeNode, level: usize },
    /// The named parent does not exist; nothing was written
    ParentNotFound,
}

/// Abstraction layer for tree persistence
///
/// Implementations must be `Send + Sync` so a single store can be shared by
/// every request handler.
#[async_trait]
pub trait TreeStore: Send + Sync {
    /// Insert a node as the last child of `parent_id`, or as a new root.
    ///
    /// Names are written in the same transaction; a duplicate language or any
    /// other write failure rolls back the node, the shift and the parent's
    /// counter.
    async fn insert_node(
        &self,
        parent_id: Option<NodeId>,
        names: &NewNodeNames,
    ) -> Result<InsertOutcome, DatabaseError>;

    /// Get node by ID (`Ok(None)` when missing)
    async fn get_node(&self, id: NodeId) -> Result<Option<TreeNode>, DatabaseError>;

    /// Every node, ordered by `left`
    async fn list_nodes(&self) -> Result<Vec<TreeNode>, DatabaseError>;

    /// Nodes with `left > bounds.left AND right < bounds.right`, ordered by `left`
    async fn query_nodes(&self, bounds: Interval) -> Result<Vec<TreeNode>, DatabaseError>;

    /// Node `id` with its ancestors (`Ok(None)` when missing)
    async fn locate(&self, id: NodeId) -> Result<Option<NodeContext>, DatabaseError>;

    /// Node `id` with its ancestors and every descendant (`Ok(None)` when missing)
    async fn subtree(&self, id: NodeId) -> Result<Option<NodeContext>, DatabaseError>;

    /// Total number of nodes
    async fn count_nodes(&self) -> Result<u64, DatabaseError>;

    /// Name of one node in one language (`Ok(None)` when missing)
    async fn get_name(
        &self,
        node_id: NodeId,
        language: &str,
    ) -> Result<Option<NodeName>, DatabaseError>;

    /// Every stored name of the given nodes
    async fn get_names(&self, node_ids: &[NodeId]) -> Result<Vec<NodeName>, DatabaseError>;
}
