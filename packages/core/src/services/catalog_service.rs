//! Catalog Service - API Boundary
//!
//! Business logic over a [`TreeStore`]:
//!
//! - `list_nodes` - every node in tree order, paginated, names resolved
//! - `get_node` - one node with its resolved name and level
//! - `search_children` - direct children of a node, paginated
//! - `ancestors` - path from the outermost root down to a node's parent
//! - `create_node` - validated insert as a new root or last child
//!
//! The service holds no tree state of its own; every call goes through the
//! store handle it was built with.

use crate::db::{InsertOutcome, NodeContext, TreeStore};
use crate::models::{Bounded, CreatedNode, NewNodeNames, NodeId, NodeView};
use crate::services::error::CatalogError;
use crate::services::names::{lookup_order, placeholder_name, NameIndex, DEFAULT_LANGUAGE};
use crate::services::pagination::{paginate, PageInfo};
use crate::tree::{direct_children, levels, verify_forest};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// One page of the full node listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePage {
    pub nodes: Vec<NodeView>,
    pub pagination: PageInfo,
}

/// One page of a node's direct children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildrenPage {
    pub parent_id: NodeId,
    pub parent_name: String,
    pub children: Vec<NodeView>,
    pub pagination: PageInfo,
}

/// Summary returned by a full-tree consistency check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeReport {
    pub node_count: usize,
    pub root_count: usize,
}

pub struct CatalogService {
    store: Arc<dyn TreeStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn TreeStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn TreeStore> {
        &self.store
    }

    async fn locate(&self, id: NodeId) -> Result<NodeContext, CatalogError> {
        self.store
            .locate(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(id))
    }

    async fn name_index(&self, ids: &[NodeId]) -> Result<NameIndex, CatalogError> {
        Ok(NameIndex::from_names(self.store.get_names(ids).await?))
    }

    /// Resolve a node's display name: requested language, then fallbacks,
    /// then `"Node {id}"`. Never fails for a missing node or name.
    #[instrument(skip(self))]
    pub async fn node_name(&self, id: NodeId, language: &str) -> Result<String, CatalogError> {
        for lang in lookup_order(language) {
            if let Some(name) = self.store.get_name(id, lang).await? {
                return Ok(name.text);
            }
        }
        Ok(placeholder_name(id))
    }

    /// List every node in tree order.
    ///
    /// `page_size` is expected to be clamped already (see
    /// [`crate::services::pagination::clamp_page_size`]).
    #[instrument(skip(self))]
    pub async fn list_nodes(
        &self,
        page_number: i64,
        page_size: usize,
        language: &str,
    ) -> Result<NodePage, CatalogError> {
        let all = self.store.list_nodes().await?;
        let all_levels = levels(&all);

        let page = paginate(
            all.into_iter().zip(all_levels).collect::<Vec<_>>(),
            page_number,
            page_size,
        );
        let ids: Vec<NodeId> = page.items.iter().map(|(n, _)| n.id).collect();
        let names = self.name_index(&ids).await?;

        let nodes = page
            .items
            .iter()
            .map(|(node, level)| NodeView::new(node, names.resolve(node.id, language), *level))
            .collect();

        debug!(
            total = page.info.total_items,
            page = page.info.current_page,
            "Listed nodes"
        );
        Ok(NodePage {
            nodes,
            pagination: page.info,
        })
    }

    /// Get a single node
    #[instrument(skip(self))]
    pub async fn get_node(&self, id: NodeId, language: &str) -> Result<NodeView, CatalogError> {
        let located = self.locate(id).await?;
        let name = self.node_name(id, language).await?;
        Ok(NodeView::new(&located.node, name, located.level()))
    }

    /// Direct children of `parent_id`, ordered by `left`.
    ///
    /// The parent, its ancestors and its descendants come from one store
    /// snapshot, so an insert committed meanwhile cannot skew the result.
    /// Names are read afterwards; they are written with their node and never
    /// change, so every node in the snapshot already has its final names.
    #[instrument(skip(self))]
    pub async fn search_children(
        &self,
        parent_id: NodeId,
        page_number: i64,
        page_size: usize,
        language: &str,
    ) -> Result<ChildrenPage, CatalogError> {
        let subtree = self
            .store
            .subtree(parent_id)
            .await?
            .ok_or_else(|| CatalogError::not_found(parent_id))?;
        let parent = &subtree.node;
        let children = direct_children(parent.interval(), &subtree.descendants);

        if children.len() as i64 != parent.children_count {
            debug!(
                parent = %parent,
                recorded = parent.children_count,
                found = children.len(),
                "children_count disagrees with stored intervals"
            );
        }

        let page = paginate(children, page_number, page_size);
        let mut ids: Vec<NodeId> = page.items.iter().map(|n| n.id).collect();
        ids.push(parent_id);
        let names = self.name_index(&ids).await?;

        let child_level = subtree.level() + 1;
        let children = page
            .items
            .iter()
            .map(|child| NodeView::new(child, names.resolve(child.id, language), child_level))
            .collect();

        Ok(ChildrenPage {
            parent_id,
            parent_name: names.resolve(parent_id, language),
            children,
            pagination: page.info,
        })
    }

    /// Ancestors of `id` from the outermost root down to its parent
    #[instrument(skip(self))]
    pub async fn ancestors(&self, id: NodeId, language: &str) -> Result<Vec<NodeView>, CatalogError> {
        let located = self.locate(id).await?;
        let ids: Vec<NodeId> = located.ancestors.iter().map(|a| a.id).collect();
        let names = self.name_index(&ids).await?;

        Ok(located
            .ancestors
            .iter()
            .enumerate()
            .map(|(level, a)| NodeView::new(a, names.resolve(a.id, language), level))
            .collect())
    }

    /// Create a node from a `language -> text` mapping.
    ///
    /// Empty texts are skipped; at least one non-empty text is required.
    /// Without a parent the node becomes a new root. Everything returned is
    /// known once the insert commits; no read follows it.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty mapping or blank language code
    /// - `NotFound(parent_id)` when the parent does not exist (nothing written)
    /// - `StorageFailure` when the insert was rolled back
    #[instrument(skip(self, names))]
    pub async fn create_node(
        &self,
        parent_id: Option<NodeId>,
        names: BTreeMap<String, String>,
    ) -> Result<CreatedNode, CatalogError> {
        let names = NewNodeNames::from_mapping(names).map_err(|e| {
            debug!(field = e.field(), "Rejected node names");
            e
        })?;

        let (node, level) = match self.store.insert_node(parent_id, &names).await? {
            InsertOutcome::Created { node, level } => (node, level),
            InsertOutcome::ParentNotFound => {
                let id = parent_id.ok_or_else(|| {
                    CatalogError::internal("store reported a missing parent for a root insert")
                })?;
                return Err(CatalogError::not_found(id));
            }
        };

        let stored = names.to_map();
        let name = lookup_order(DEFAULT_LANGUAGE)
            .into_iter()
            .find_map(|lang| stored.get(lang).cloned())
            .or_else(|| stored.values().next().cloned())
            .unwrap_or_else(|| placeholder_name(node.id));

        info!(node_id = node.id, parent_id = ?parent_id, level, "Created node");
        Ok(CreatedNode {
            node: NodeView::new(&node, name, level),
            parent_id,
            names: stored,
        })
    }

    /// Check every nested-set invariant over the whole tree
    #[instrument(skip(self))]
    pub async fn verify_tree(&self) -> Result<TreeReport, CatalogError> {
        let nodes = self.store.list_nodes().await?;
        verify_forest(&nodes)?;
        let root_count = levels(&nodes).iter().filter(|l| **l == 0).count();
        Ok(TreeReport {
            node_count: nodes.len(),
            root_count,
        })
    }
}
