//! Caller-facing node representation
//!
//! `NodeView` is what the API boundary hands out: the stored boundaries plus
//! everything derived from them and the resolved display name. Field names
//! follow the catalog's wire format (`lft`, `rgt`).

use crate::models::{NodeId, TreeNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeView {
    pub id: NodeId,
    pub name: String,
    #[serde(rename = "lft")]
    pub left: i64,
    #[serde(rename = "rgt")]
    pub right: i64,
    pub children_count: i64,
    pub is_leaf: bool,
    pub depth: i64,
    /// Number of ancestors; roots are level 0
    pub level: usize,
}

impl NodeView {
    pub fn new(node: &TreeNode, name: String, level: usize) -> Self {
        Self {
            id: node.id,
            name,
            left: node.left,
            right: node.right,
            children_count: node.children_count,
            is_leaf: node.is_leaf(),
            depth: node.depth(),
            level,
        }
    }
}

/// Result of a successful node creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedNode {
    #[serde(flatten)]
    pub node: NodeView,
    pub parent_id: Option<NodeId>,
    /// Names actually stored, keyed by language
    pub names: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_wire_format() {
        let node = TreeNode::new(3, 2, 7, 2);
        let view = NodeView::new(&node, "Sales".to_string(), 1);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["lft"], 2);
        assert_eq!(json["rgt"], 7);
        assert_eq!(json["is_leaf"], false);
        assert_eq!(json["depth"], 2);
        assert_eq!(json["level"], 1);
        assert!(json.get("left").is_none());
    }

    #[test]
    fn test_created_node_flattens_view() {
        let node = TreeNode::new(4, 8, 9, 0);
        let created = CreatedNode {
            node: NodeView::new(&node, "Italy".to_string(), 2),
            parent_id: Some(3),
            names: BTreeMap::from([("en".to_string(), "Italy".to_string())]),
        };

        let json = serde_json::to_value(&created).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["parent_id"], 3);
        assert_eq!(json["names"]["en"], "Italy");
        assert_eq!(json["is_leaf"], true);
    }
}
