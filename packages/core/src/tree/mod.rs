//! Nested-Set Engine
//!
//! Pure logic over interval boundaries. Nothing in this module touches storage:
//! stores ask the engine for an [`InsertPlan`] and apply it inside their own
//! transaction.
//!
//! - [`plan_child_insert`] / [`plan_root_insert`] - boundaries for a new node
//!   and the compensating [`BoundaryShift`] for everything else
//! - [`direct_children`] - first-open-ancestor filter over a parent's descendants
//! - [`levels`] - ancestor count for every node in one pass
//! - [`verify_forest`] - checks the nested-set invariants over a full node set

mod nested_set;

pub use nested_set::{
    direct_children, direct_children_pairwise, levels, plan_child_insert, plan_root_insert,
    verify_forest, BoundaryShift, InsertPlan, InvariantViolation, SLOT_WIDTH,
};
