//! Interval arithmetic for the nested-set tree.
//!
//! # Insert shift
//!
//! A child is always appended as the parent's last child. With `X` the parent's
//! `right` boundary before the insert:
//!
//! - every node with `right >= X` grows its `right` by [`SLOT_WIDTH`]
//!   (the parent, all of its ancestors, and every node to the right)
//! - every node with `left > X` moves its `left` by [`SLOT_WIDTH`]
//!   (only nodes entirely to the right of the insertion point)
//! - the new node takes `(X, X + 1)`
//!
//! The asymmetry matters: an ancestor's `left` is below `X` and must stay put
//! while its `right` grows; a left sibling's `right` is below `X` and must not move.

use crate::models::{Bounded, Interval, NodeId, TreeNode};
use std::collections::HashMap;
use thiserror::Error;

/// Boundary slots consumed by one leaf node
pub const SLOT_WIDTH: i64 = 2;

/// Compensating shift applied to every existing node when space is opened at `at`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryShift {
    /// Parent's `right` boundary before the insert
    pub at: i64,
    /// Amount added to shifted boundaries
    pub width: i64,
}

impl BoundaryShift {
    pub fn shifts_right(&self, right: i64) -> bool {
        right >= self.at
    }

    pub fn shifts_left(&self, left: i64) -> bool {
        left > self.at
    }

    /// Apply the shift to one existing interval
    pub fn apply(&self, interval: &mut Interval) {
        if self.shifts_right(interval.right) {
            interval.right += self.width;
        }
        if self.shifts_left(interval.left) {
            interval.left += self.width;
        }
    }
}

/// Boundaries for a node about to be inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertPlan {
    /// Interval the new node occupies after the shift
    pub interval: Interval,
    /// Shift to apply to existing nodes first; `None` for roots
    pub shift: Option<BoundaryShift>,
}

/// Plan a new root.
///
/// Roots are laid out side by side: each new root opens right after the highest
/// boundary currently in use, so no two roots ever share a boundary value.
/// `max_right` is `None` for an empty tree, which yields `(1, 2)`.
pub fn plan_root_insert(max_right: Option<i64>) -> InsertPlan {
    let left = max_right.unwrap_or(0) + 1;
    InsertPlan {
        interval: Interval::new(left, left + 1),
        shift: None,
    }
}

/// Plan a new last child of `parent`
pub fn plan_child_insert(parent: Interval) -> InsertPlan {
    let at = parent.right;
    InsertPlan {
        interval: Interval::new(at, at + 1),
        shift: Some(BoundaryShift {
            at,
            width: SLOT_WIDTH,
        }),
    }
}

/// Direct children of `parent` among `candidates`, ordered by `left`.
///
/// Single pass over the candidates sorted by `left`, keeping a stack of
/// intervals that are still open. A candidate whose first still-open ancestor
/// is the parent itself (the stack is empty once closed intervals are popped)
/// is a direct child. Candidates outside `parent` are ignored.
pub fn direct_children<'a, T: Bounded>(parent: Interval, candidates: &'a [T]) -> Vec<&'a T> {
    let mut sorted: Vec<&T> = candidates
        .iter()
        .filter(|c| parent.contains(&c.interval()))
        .collect();
    sorted.sort_by_key(|c| c.interval().left);

    let mut open: Vec<Interval> = Vec::new();
    let mut children = Vec::new();

    for candidate in sorted {
        let current = candidate.interval();
        while open.last().is_some_and(|top| top.right < current.left) {
            open.pop();
        }
        if open.is_empty() {
            children.push(candidate);
        }
        open.push(current);
    }

    children
}

/// Reference O(k²) filter: a candidate is a direct child when no other
/// candidate contains it. Same result as [`direct_children`] on any input
/// that satisfies the nested-set invariants.
pub fn direct_children_pairwise<'a, T: Bounded>(
    parent: Interval,
    candidates: &'a [T],
) -> Vec<&'a T> {
    let inside: Vec<&T> = candidates
        .iter()
        .filter(|c| parent.contains(&c.interval()))
        .collect();

    let mut children: Vec<&T> = inside
        .iter()
        .enumerate()
        .filter(|(i, x)| {
            let xi = x.interval();
            !inside
                .iter()
                .enumerate()
                .any(|(j, y)| *i != j && y.interval().contains(&xi))
        })
        .map(|(_, x)| *x)
        .collect();
    children.sort_by_key(|c| c.interval().left);
    children
}

/// Number of ancestors of each node, in the order of `nodes`.
///
/// `nodes` must be a complete forest (every ancestor of every node present),
/// otherwise the result counts only the ancestors that were supplied.
pub fn levels<T: Bounded>(nodes: &[T]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by_key(|&i| nodes[i].interval().left);

    let mut result = vec![0; nodes.len()];
    let mut open: Vec<Interval> = Vec::new();

    for i in order {
        let current = nodes[i].interval();
        while open.last().is_some_and(|top| top.right < current.left) {
            open.pop();
        }
        result[i] = open.len();
        open.push(current);
    }

    result
}

/// A broken nested-set invariant
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Node {id} has an empty or inverted interval ({left}, {right})")]
    InvalidInterval { id: NodeId, left: i64, right: i64 },

    #[error("Boundary {value} is shared by nodes {first} and {second}")]
    SharedBoundary {
        value: i64,
        first: NodeId,
        second: NodeId,
    },

    #[error("Nodes {outer} and {inner} partially overlap")]
    PartialOverlap { outer: NodeId, inner: NodeId },

    #[error("Node {id} records {recorded} children but has {actual} direct children")]
    ChildrenCountMismatch {
        id: NodeId,
        recorded: i64,
        actual: i64,
    },
}

/// Check a complete node set against the nested-set invariants:
/// non-empty intervals, pairwise distinct boundaries, no partial overlap,
/// and `children_count` equal to the number of direct children.
pub fn verify_forest(nodes: &[TreeNode]) -> Result<(), InvariantViolation> {
    let mut seen: HashMap<i64, NodeId> = HashMap::with_capacity(nodes.len() * 2);
    for node in nodes {
        if node.left >= node.right {
            return Err(InvariantViolation::InvalidInterval {
                id: node.id,
                left: node.left,
                right: node.right,
            });
        }
        for value in [node.left, node.right] {
            if let Some(&first) = seen.get(&value) {
                return Err(InvariantViolation::SharedBoundary {
                    value,
                    first,
                    second: node.id,
                });
            }
            seen.insert(value, node.id);
        }
    }

    let mut sorted: Vec<&TreeNode> = nodes.iter().collect();
    sorted.sort_by_key(|n| n.left);

    let mut actual: HashMap<NodeId, i64> = nodes.iter().map(|n| (n.id, 0)).collect();
    let mut open: Vec<&TreeNode> = Vec::new();

    for node in sorted {
        while open.last().is_some_and(|top| top.right < node.left) {
            open.pop();
        }
        if let Some(parent) = open.last() {
            if node.right > parent.right {
                return Err(InvariantViolation::PartialOverlap {
                    outer: parent.id,
                    inner: node.id,
                });
            }
            *actual.entry(parent.id).or_default() += 1;
        }
        open.push(node);
    }

    for node in nodes {
        let count = actual.get(&node.id).copied().unwrap_or_default();
        if count != node.children_count {
            return Err(InvariantViolation::ChildrenCountMismatch {
                id: node.id,
                recorded: node.children_count,
                actual: count,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Apply a plan to an in-memory node set the way a store would
    fn insert(nodes: &mut Vec<TreeNode>, parent_id: Option<NodeId>) -> NodeId {
        let plan = match parent_id {
            Some(pid) => {
                let parent = nodes.iter_mut().find(|n| n.id == pid).unwrap();
                parent.children_count += 1;
                plan_child_insert(parent.interval())
            }
            None => plan_root_insert(nodes.iter().map(|n| n.right).max()),
        };
        if let Some(shift) = plan.shift {
            for node in nodes.iter_mut() {
                let mut interval = node.interval();
                shift.apply(&mut interval);
                node.left = interval.left;
                node.right = interval.right;
            }
        }
        let id = nodes.len() as NodeId + 1;
        nodes.push(TreeNode::new(
            id,
            plan.interval.left,
            plan.interval.right,
            0,
        ));
        id
    }

    fn get(nodes: &[TreeNode], id: NodeId) -> &TreeNode {
        nodes.iter().find(|n| n.id == id).unwrap()
    }

    #[test]
    fn test_first_root_opens_at_one() {
        let plan = plan_root_insert(None);
        assert_eq!(plan.interval, Interval::new(1, 2));
        assert!(plan.shift.is_none());
    }

    #[test]
    fn test_second_root_opens_after_existing_roots() {
        let plan = plan_root_insert(Some(6));
        assert_eq!(plan.interval, Interval::new(7, 8));
    }

    #[test]
    fn test_child_insert_scenario() {
        let mut nodes = Vec::new();
        let root = insert(&mut nodes, None);
        assert_eq!(get(&nodes, root).interval(), Interval::new(1, 2));

        let first = insert(&mut nodes, Some(root));
        assert_eq!(get(&nodes, root).interval(), Interval::new(1, 4));
        assert_eq!(get(&nodes, first).interval(), Interval::new(2, 3));
        assert_eq!(get(&nodes, root).children_count, 1);

        let second = insert(&mut nodes, Some(root));
        assert_eq!(get(&nodes, root).interval(), Interval::new(1, 6));
        assert_eq!(get(&nodes, first).interval(), Interval::new(2, 3));
        assert_eq!(get(&nodes, second).interval(), Interval::new(4, 5));
        assert_eq!(get(&nodes, root).children_count, 2);
        assert_eq!(get(&nodes, second).children_count, 0);
    }

    #[test]
    fn test_shift_boundary_conditions() {
        let shift = BoundaryShift { at: 4, width: 2 };

        // Ancestor: left stays, right grows
        let mut ancestor = Interval::new(1, 4);
        shift.apply(&mut ancestor);
        assert_eq!(ancestor, Interval::new(1, 6));

        // Left sibling: untouched
        let mut sibling = Interval::new(2, 3);
        shift.apply(&mut sibling);
        assert_eq!(sibling, Interval::new(2, 3));

        // Entirely to the right: moves as a whole
        let mut right = Interval::new(5, 8);
        shift.apply(&mut right);
        assert_eq!(right, Interval::new(7, 10));
    }

    #[test]
    fn test_insert_under_nested_parent_widens_all_ancestors() {
        let mut nodes = Vec::new();
        let root = insert(&mut nodes, None);
        let a = insert(&mut nodes, Some(root));
        let b = insert(&mut nodes, Some(root));
        let c = insert(&mut nodes, Some(a));

        assert_eq!(get(&nodes, root).interval(), Interval::new(1, 8));
        assert_eq!(get(&nodes, a).interval(), Interval::new(2, 5));
        assert_eq!(get(&nodes, c).interval(), Interval::new(3, 4));
        assert_eq!(get(&nodes, b).interval(), Interval::new(6, 7));
        verify_forest(&nodes).unwrap();
    }

    #[test]
    fn test_invariants_hold_after_every_insert() {
        let mut nodes: Vec<TreeNode> = Vec::new();
        // Deterministic mix of roots and children at varying depths
        let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
        for step in 0..120 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let parent = if nodes.is_empty() || step % 17 == 0 {
                None
            } else {
                Some(nodes[(seed % nodes.len() as u64) as usize].id)
            };
            insert(&mut nodes, parent);
            verify_forest(&nodes).unwrap();
        }
        for (node, level) in nodes.iter().zip(levels(&nodes)) {
            assert_eq!(node.is_leaf(), node.children_count == 0);
            if level == 0 && node.is_leaf() {
                assert_eq!(node.depth(), 0);
            }
        }
    }

    #[test]
    fn test_direct_children_excludes_grandchildren() {
        let mut nodes = Vec::new();
        let p = insert(&mut nodes, None);
        let a = insert(&mut nodes, Some(p));
        let b = insert(&mut nodes, Some(p));
        let c = insert(&mut nodes, Some(a));

        let parent = get(&nodes, p).interval();
        let descendants: Vec<TreeNode> = nodes
            .iter()
            .filter(|n| parent.contains(&n.interval()))
            .cloned()
            .collect();
        assert_eq!(descendants.len(), 3);

        let ids: Vec<NodeId> = direct_children(parent, &descendants)
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec![a, b]);
        assert!(!ids.contains(&c));
    }

    #[test]
    fn test_direct_children_algorithms_agree() {
        let mut nodes = Vec::new();
        let root = insert(&mut nodes, None);
        for i in 0..40 {
            let parent = nodes[(i * 7) % nodes.len()].id;
            insert(&mut nodes, Some(parent));
        }
        insert(&mut nodes, None);

        for node in &nodes {
            let fast: Vec<NodeId> = direct_children(node.interval(), &nodes)
                .iter()
                .map(|n| n.id)
                .collect();
            let slow: Vec<NodeId> = direct_children_pairwise(node.interval(), &nodes)
                .iter()
                .map(|n| n.id)
                .collect();
            assert_eq!(fast, slow, "mismatch under node {}", node.id);
            assert_eq!(fast.len() as i64, node.children_count);
        }
        assert!(get(&nodes, root).children_count > 0);
    }

    #[test]
    fn test_direct_children_ignores_nodes_outside_parent() {
        let parent = Interval::new(1, 6);
        let candidates = vec![
            Interval::new(2, 3),
            Interval::new(4, 5),
            Interval::new(7, 8),
        ];
        let children = direct_children(parent, &candidates);
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn test_levels_count_ancestors() {
        let mut nodes = Vec::new();
        let root = insert(&mut nodes, None);
        let a = insert(&mut nodes, Some(root));
        let c = insert(&mut nodes, Some(a));
        let second_root = insert(&mut nodes, None);

        let levels = levels(&nodes);
        let level_of = |id: NodeId| levels[nodes.iter().position(|n| n.id == id).unwrap()];
        assert_eq!(level_of(root), 0);
        assert_eq!(level_of(a), 1);
        assert_eq!(level_of(c), 2);
        assert_eq!(level_of(second_root), 0);
    }

    #[test]
    fn test_verify_detects_shared_boundary() {
        let nodes = vec![TreeNode::new(1, 1, 2, 0), TreeNode::new(2, 1, 2, 0)];
        assert!(matches!(
            verify_forest(&nodes),
            Err(InvariantViolation::SharedBoundary { value: 1, .. })
        ));
    }

    #[test]
    fn test_verify_detects_partial_overlap() {
        let nodes = vec![TreeNode::new(1, 1, 4, 1), TreeNode::new(2, 3, 6, 0)];
        assert_eq!(
            verify_forest(&nodes),
            Err(InvariantViolation::PartialOverlap { outer: 1, inner: 2 })
        );
    }

    #[test]
    fn test_verify_detects_children_count_drift() {
        let nodes = vec![TreeNode::new(1, 1, 4, 0), TreeNode::new(2, 2, 3, 0)];
        assert_eq!(
            verify_forest(&nodes),
            Err(InvariantViolation::ChildrenCountMismatch {
                id: 1,
                recorded: 0,
                actual: 1
            })
        );
    }

    #[test]
    fn test_verify_detects_inverted_interval() {
        let nodes = vec![TreeNode::new(1, 3, 3, 0)];
        assert!(matches!(
            verify_forest(&nodes),
            Err(InvariantViolation::InvalidInterval { id: 1, .. })
        ));
    }
}
