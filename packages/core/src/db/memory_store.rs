//! In-process TreeStore
//!
//! Keeps nodes and names in memory behind a `tokio::sync::RwLock`. An insert
//! validates everything it is about to write and then mutates under a single
//! write guard, so it is applied entirely or not at all and readers never
//! observe a half-applied shift. Useful for tests and throwaway servers.

use crate::db::tree_store::{InsertOutcome, NodeContext, TreeStore};
use crate::db::DatabaseError;
use crate::models::{Bounded, Interval, NewNodeNames, NodeId, NodeName, TreeNode};
use crate::tree::{plan_child_insert, plan_root_insert};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Default)]
struct MemoryState {
    nodes: BTreeMap<NodeId, TreeNode>,
    names: BTreeMap<(NodeId, String), String>,
    last_id: NodeId,
}

impl MemoryState {
    /// Node `id` plus every node containing it, and optionally every node inside it
    fn context(&self, id: NodeId, with_descendants: bool) -> Option<NodeContext> {
        let target = self.nodes.get(&id)?.interval();
        let rows = self.sorted_by_left(self.nodes.values().filter(|n| {
            let current = n.interval();
            current == target
                || current.contains(&target)
                || (with_descendants && target.contains(&current))
        }));
        NodeContext::from_rows(id, rows)
    }

    fn sorted_by_left<'a>(&self, nodes: impl Iterator<Item = &'a TreeNode>) -> Vec<TreeNode> {
        let mut out: Vec<TreeNode> = nodes.cloned().collect();
        out.sort_by_key(|n| n.left);
        out
    }
}

/// TreeStore kept entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject what the relational schema would reject: repeated languages and blank values
    fn check_names(names: &NewNodeNames) -> Result<(), DatabaseError> {
        let mut seen = HashSet::new();
        for (language, text) in names.entries() {
            if language.is_empty() || text.is_empty() {
                return Err(DatabaseError::constraint_violation(
                    "name language and text must not be empty",
                ));
            }
            if !seen.insert(language.as_str()) {
                return Err(DatabaseError::constraint_violation(format!(
                    "duplicate name for language '{}'",
                    language
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TreeStore for MemoryStore {
    async fn insert_node(
        &self,
        parent_id: Option<NodeId>,
        names: &NewNodeNames,
    ) -> Result<InsertOutcome, DatabaseError> {
        Self::check_names(names)?;

        let mut state = self.state.write().await;

        let plan = match parent_id {
            Some(pid) => match state.nodes.get(&pid) {
                Some(parent) => plan_child_insert(parent.interval()),
                None => return Ok(InsertOutcome::ParentNotFound),
            },
            None => plan_root_insert(state.nodes.values().map(|n| n.right).max()),
        };

        if let Some(shift) = plan.shift {
            for node in state.nodes.values_mut() {
                let mut interval = node.interval();
                shift.apply(&mut interval);
                node.left = interval.left;
                node.right = interval.right;
            }
        }
        if let Some(parent) = parent_id.and_then(|pid| state.nodes.get_mut(&pid)) {
            parent.children_count += 1;
        }

        state.last_id += 1;
        let node = TreeNode::new(state.last_id, plan.interval.left, plan.interval.right, 0);
        state.nodes.insert(node.id, node.clone());
        let level = state
            .nodes
            .values()
            .filter(|n| n.interval().contains(&plan.interval))
            .count();
        for (language, text) in names.entries() {
            state
                .names
                .insert((node.id, language.clone()), text.clone());
        }

        info!(
            node_id = node.id,
            parent_id = ?parent_id,
            lft = node.left,
            rgt = node.right,
            level,
            "Inserted node"
        );
        Ok(InsertOutcome::Created { node, level })
    }

    async fn get_node(&self, id: NodeId) -> Result<Option<TreeNode>, DatabaseError> {
        Ok(self.state.read().await.nodes.get(&id).cloned())
    }

    async fn list_nodes(&self) -> Result<Vec<TreeNode>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.sorted_by_left(state.nodes.values()))
    }

    async fn query_nodes(&self, bounds: Interval) -> Result<Vec<TreeNode>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.sorted_by_left(
            state
                .nodes
                .values()
                .filter(|n| bounds.contains(&n.interval())),
        ))
    }

    async fn locate(&self, id: NodeId) -> Result<Option<NodeContext>, DatabaseError> {
        Ok(self.state.read().await.context(id, false))
    }

    async fn subtree(&self, id: NodeId) -> Result<Option<NodeContext>, DatabaseError> {
        Ok(self.state.read().await.context(id, true))
    }

    async fn count_nodes(&self) -> Result<u64, DatabaseError> {
        Ok(self.state.read().await.nodes.len() as u64)
    }

    async fn get_name(
        &self,
        node_id: NodeId,
        language: &str,
    ) -> Result<Option<NodeName>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state
            .names
            .get(&(node_id, language.to_string()))
            .map(|text| NodeName {
                node_id,
                language: language.to_string(),
                text: text.clone(),
            }))
    }

    async fn get_names(&self, node_ids: &[NodeId]) -> Result<Vec<NodeName>, DatabaseError> {
        let wanted: HashSet<NodeId> = node_ids.iter().copied().collect();
        let state = self.state.read().await;
        Ok(state
            .names
            .iter()
            .filter(|((id, _), _)| wanted.contains(id))
            .map(|((id, language), text)| NodeName {
                node_id: *id,
                language: language.clone(),
                text: text.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::verify_forest;

    fn names(lang: &str, text: &str) -> NewNodeNames {
        NewNodeNames::from_entries(vec![(lang.to_string(), text.to_string())])
    }

    async fn created(store: &MemoryStore, parent: Option<NodeId>) -> TreeNode {
        match store.insert_node(parent, &names("en", "n")).await.unwrap() {
            InsertOutcome::Created { node, .. } => node,
            InsertOutcome::ParentNotFound => panic!("parent {:?} missing", parent),
        }
    }

    #[tokio::test]
    async fn test_roots_get_disjoint_intervals() {
        let store = MemoryStore::new();
        let first = created(&store, None).await;
        let second = created(&store, None).await;

        assert_eq!(first.interval(), Interval::new(1, 2));
        assert_eq!(second.interval(), Interval::new(3, 4));
        verify_forest(&store.list_nodes().await.unwrap()).unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_language_writes_nothing() {
        let store = MemoryStore::new();
        let root = created(&store, None).await;

        let dup = NewNodeNames::from_entries(vec![
            ("en".to_string(), "A".to_string()),
            ("en".to_string(), "B".to_string()),
        ]);
        let err = store.insert_node(Some(root.id), &dup).await.unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation { .. }));

        assert_eq!(store.count_nodes().await.unwrap(), 1);
        let root_after = store.get_node(root.id).await.unwrap().unwrap();
        assert_eq!(root_after, root);
    }

    #[tokio::test]
    async fn test_missing_parent_writes_nothing() {
        let store = MemoryStore::new();
        let outcome = store.insert_node(Some(999), &names("en", "x")).await.unwrap();
        assert_eq!(outcome, InsertOutcome::ParentNotFound);
        assert_eq!(store.count_nodes().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_reports_level() {
        let store = MemoryStore::new();
        let root = created(&store, None).await;
        let child = created(&store, Some(root.id)).await;

        let outcome = store.insert_node(Some(child.id), &names("en", "g")).await.unwrap();
        let InsertOutcome::Created { level, .. } = outcome else {
            panic!("expected a created node");
        };
        assert_eq!(level, 2);
    }

    #[tokio::test]
    async fn test_locate_and_subtree() {
        let store = MemoryStore::new();
        let root = created(&store, None).await;
        let left = created(&store, Some(root.id)).await;
        let middle = created(&store, Some(root.id)).await;
        let inner = created(&store, Some(middle.id)).await;
        created(&store, None).await;

        let located = store.locate(middle.id).await.unwrap().unwrap();
        assert_eq!(located.node.id, middle.id);
        assert_eq!(located.level(), 1);
        assert!(located.descendants.is_empty());

        let subtree = store.subtree(middle.id).await.unwrap().unwrap();
        let ancestors: Vec<NodeId> = subtree.ancestors.iter().map(|n| n.id).collect();
        let descendants: Vec<NodeId> = subtree.descendants.iter().map(|n| n.id).collect();
        assert_eq!(ancestors, vec![root.id]);
        assert_eq!(descendants, vec![inner.id]);
        assert!(!descendants.contains(&left.id));

        assert!(store.subtree(999).await.unwrap().is_none());
    }
}
