//! Tree Node Data Structures
//!
//! This module defines the `TreeNode` struct and the `Interval` value type used
//! by the nested-set encoding of the catalog tree.
//!
//! # Nested Set Encoding
//!
//! Every node owns an integer interval `(left, right)`. A node is a descendant
//! of another exactly when its interval is strictly contained in the other's:
//!
//! ```text
//! Company (1, 8)
//! ├── Marketing (2, 3)
//! └── Sales     (4, 7)
//!     └── Italy (5, 6)
//! ```
//!
//! # Examples
//!
//! ```rust
//! use nodetree_core::models::TreeNode;
//!
//! let root = TreeNode::new(1, 1, 6, 2);
//! let child = TreeNode::new(2, 2, 3, 0);
//!
//! assert!(root.contains(&child));
//! assert!(child.is_leaf());
//! assert_eq!(root.depth(), 2);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier assigned by the store at creation, never reused
pub type NodeId = i64;

/// Validation errors for caller-supplied input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidField { field: String, reason: String },
}

impl ValidationError {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    /// Create an invalid field error
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField(field) => field,
            Self::InvalidField { field, .. } => field,
        }
    }
}

/// A closed integer interval `[left, right]` with `left < right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub left: i64,
    pub right: i64,
}

impl Interval {
    pub const fn new(left: i64, right: i64) -> Self {
        Self { left, right }
    }

    /// Strict containment: `other` lies entirely inside `self`
    pub fn contains(&self, other: &Interval) -> bool {
        self.left < other.left && other.right < self.right
    }
}

/// Anything that occupies an interval in the nested-set encoding
pub trait Bounded {
    fn interval(&self) -> Interval;
}

impl Bounded for Interval {
    fn interval(&self) -> Interval {
        *self
    }
}

/// A persisted node of the catalog tree.
///
/// # Fields
///
/// - `id`: Store-assigned identifier
/// - `left`, `right`: Nested-set boundaries, rewritten only by inserts
/// - `children_count`: Number of direct children, maintained explicitly on insert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub left: i64,
    pub right: i64,
    pub children_count: i64,
}

impl TreeNode {
    pub fn new(id: NodeId, left: i64, right: i64, children_count: i64) -> Self {
        Self {
            id,
            left,
            right,
            children_count,
        }
    }

    /// A node without direct children
    pub fn is_leaf(&self) -> bool {
        self.children_count == 0
    }

    /// `(right - left - 1) / 2` with integer division.
    ///
    /// This is the number of nodes nested below this one, which is the value
    /// the catalog has always reported as `depth`. The number of ancestors is
    /// computed separately (see [`crate::tree::levels`]).
    pub fn depth(&self) -> i64 {
        (self.right - self.left - 1) / 2
    }

    /// True when `other` is a (possibly indirect) descendant of this node
    pub fn contains(&self, other: &TreeNode) -> bool {
        self.interval().contains(&other.interval())
    }
}

impl Bounded for TreeNode {
    fn interval(&self) -> Interval {
        Interval::new(self.left, self.right)
    }
}

impl std::fmt::Display for TreeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node {} (lft: {}, rgt: {})", self.id, self.left, self.right)
    }
}
