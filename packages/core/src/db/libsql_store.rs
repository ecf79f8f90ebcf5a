//! LibsqlStore - TreeStore Implementation for libsql
//!
//! Persists nodes and names in the embedded libsql database managed by
//! [`DatabaseService`]. Inserts run inside `BEGIN IMMEDIATE`, which takes the
//! write lock before the parent's boundaries are read. Two concurrent inserts
//! therefore never interleave their read-modify-write of boundaries, and WAL
//! readers keep seeing the last committed state until `COMMIT`.
//!
//! `locate` and `subtree` are single statements joined on the target row, so
//! the node's boundaries and the rows selected by them come from one snapshot.

use crate::db::tree_store::{InsertOutcome, NodeContext, TreeStore};
use crate::db::{DatabaseError, DatabaseService};
use crate::models::{Interval, NewNodeNames, NodeId, NodeName, TreeNode};
use crate::tree::{plan_child_insert, plan_root_insert};
use async_trait::async_trait;
use libsql::params::Params;
use libsql::{Connection, Row, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

const NODE_COLUMNS: &str = "id, lft, rgt, children_count";

/// Node `?1` and every node containing it, in one statement
const LOCATE_SQL: &str = "SELECT a.id, a.lft, a.rgt, a.children_count
     FROM nodes a JOIN nodes n ON n.id = ?1
     WHERE a.lft <= n.lft AND a.rgt >= n.rgt
     ORDER BY a.lft ASC";

/// Node `?1`, its ancestors and its descendants, in one statement
const SUBTREE_SQL: &str = "SELECT x.id, x.lft, x.rgt, x.children_count
     FROM nodes x JOIN nodes p ON p.id = ?1
     WHERE (x.lft <= p.lft AND x.rgt >= p.rgt)
        OR (x.lft > p.lft AND x.rgt < p.rgt)
     ORDER BY x.lft ASC";

/// TreeStore backed by libsql
pub struct LibsqlStore {
    db: Arc<DatabaseService>,
}

impl LibsqlStore {
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self { db }
    }

    /// Open (or create) a database file and wrap it
    pub async fn open(db_path: std::path::PathBuf) -> Result<Self, DatabaseError> {
        let db = DatabaseService::new(db_path).await?;
        Ok(Self::new(Arc::new(db)))
    }

    /// Convert a `nodes` row (columns in `NODE_COLUMNS` order) to a TreeNode
    fn row_to_node(row: &Row) -> Result<TreeNode, DatabaseError> {
        Ok(TreeNode {
            id: row.get(0)?,
            left: row.get(1)?,
            right: row.get(2)?,
            children_count: row.get(3)?,
        })
    }

    fn row_to_name(row: &Row) -> Result<NodeName, DatabaseError> {
        Ok(NodeName {
            node_id: row.get(0)?,
            language: row.get(1)?,
            text: row.get(2)?,
        })
    }

    async fn query_node_list(
        conn: &Connection,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<Vec<TreeNode>, DatabaseError> {
        let mut rows = conn
            .query(sql, params)
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to query nodes: {}", e)))?;

        let mut nodes = Vec::new();
        while let Some(row) = rows.next().await? {
            nodes.push(Self::row_to_node(&row)?);
        }
        Ok(nodes)
    }

    async fn fetch_node(conn: &Connection, id: NodeId) -> Result<Option<TreeNode>, DatabaseError> {
        let mut rows = conn
            .query(
                &format!("SELECT {} FROM nodes WHERE id = ?1", NODE_COLUMNS),
                [id],
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to get node {}: {}", id, e)))?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::row_to_node(&row)?)),
            None => Ok(None),
        }
    }

    /// Body of the insert transaction; the caller owns BEGIN/COMMIT/ROLLBACK
    async fn insert_in_transaction(
        conn: &Connection,
        parent_id: Option<NodeId>,
        names: &NewNodeNames,
    ) -> Result<InsertOutcome, DatabaseError> {
        let plan = match parent_id {
            Some(pid) => {
                let Some(parent) = Self::fetch_node(conn, pid).await? else {
                    return Ok(InsertOutcome::ParentNotFound);
                };
                conn.execute(
                    "UPDATE nodes SET children_count = children_count + 1 WHERE id = ?1",
                    [pid],
                )
                .await
                .map_err(|e| {
                    DatabaseError::sql_execution(format!(
                        "Failed to update children_count of {}: {}",
                        pid, e
                    ))
                })?;
                plan_child_insert(Interval::new(parent.left, parent.right))
            }
            None => {
                let mut rows = conn
                    .query("SELECT MAX(rgt) FROM nodes", ())
                    .await
                    .map_err(|e| {
                        DatabaseError::sql_execution(format!("Failed to read max boundary: {}", e))
                    })?;
                let max_right: Option<i64> = match rows.next().await? {
                    Some(row) => row.get(0)?,
                    None => None,
                };
                plan_root_insert(max_right)
            }
        };

        if let Some(shift) = plan.shift {
            // rgt before lft keeps CHECK (lft < rgt) satisfied row by row
            conn.execute(
                "UPDATE nodes SET rgt = rgt + ?1 WHERE rgt >= ?2",
                (shift.width, shift.at),
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to shift right boundaries: {}", e))
            })?;
            conn.execute(
                "UPDATE nodes SET lft = lft + ?1 WHERE lft > ?2",
                (shift.width, shift.at),
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to shift left boundaries: {}", e))
            })?;
        }

        conn.execute(
            "INSERT INTO nodes (lft, rgt, children_count) VALUES (?1, ?2, 0)",
            (plan.interval.left, plan.interval.right),
        )
        .await
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to insert node: {}", e)))?;
        let id = conn.last_insert_rowid();

        let level = match parent_id {
            Some(_) => Self::count_ancestors(conn, plan.interval).await?,
            None => 0,
        };

        for (language, text) in names.entries() {
            conn.execute(
                "INSERT INTO node_names (node_id, language, node_name) VALUES (?1, ?2, ?3)",
                (id, language.as_str(), text.as_str()),
            )
            .await
            .map_err(|e| {
                DatabaseError::constraint_violation(format!(
                    "Failed to store '{}' name for node {}: {}",
                    language, id, e
                ))
            })?;
        }

        Ok(InsertOutcome::Created {
            node: TreeNode::new(id, plan.interval.left, plan.interval.right, 0),
            level,
        })
    }

    /// Ancestors of `bounds` as seen by the open transaction
    async fn count_ancestors(conn: &Connection, bounds: Interval) -> Result<usize, DatabaseError> {
        let mut rows = conn
            .query(
                "SELECT COUNT(*) FROM nodes WHERE lft < ?1 AND rgt > ?2",
                (bounds.left, bounds.right),
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to count ancestors: {}", e)))?;
        let count: i64 = match rows.next().await? {
            Some(row) => row.get(0)?,
            None => 0,
        };
        Ok(count.max(0) as usize)
    }

    async fn node_context(
        &self,
        sql: &str,
        id: NodeId,
    ) -> Result<Option<NodeContext>, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;
        let rows = Self::query_node_list(&conn, sql, [id]).await?;
        Ok(NodeContext::from_rows(id, rows))
    }
}

#[async_trait]
impl TreeStore for LibsqlStore {
    async fn insert_node(
        &self,
        parent_id: Option<NodeId>,
        names: &NewNodeNames,
    ) -> Result<InsertOutcome, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;

        conn.execute("BEGIN IMMEDIATE TRANSACTION", ())
            .await
            .map_err(|e| {
                DatabaseError::transaction_failed(format!("Failed to begin transaction: {}", e))
            })?;

        match Self::insert_in_transaction(&conn, parent_id, names).await {
            Ok(InsertOutcome::Created { node, level }) => {
                if let Err(e) = conn.execute("COMMIT", ()).await {
                    let _rollback = conn.execute("ROLLBACK", ()).await;
                    return Err(DatabaseError::transaction_failed(format!(
                        "Failed to commit transaction: {}",
                        e
                    )));
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
            Ok(InsertOutcome::ParentNotFound) => {
                let _rollback = conn.execute("ROLLBACK", ()).await;
                debug!(parent_id = ?parent_id, "Insert skipped, parent not found");
                Ok(InsertOutcome::ParentNotFound)
            }
            Err(e) => {
                let _rollback = conn.execute("ROLLBACK", ()).await;
                warn!(parent_id = ?parent_id, "Insert rolled back: {}", e);
                Err(e)
            }
        }
    }

    async fn get_node(&self, id: NodeId) -> Result<Option<TreeNode>, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;
        Self::fetch_node(&conn, id).await
    }

    async fn list_nodes(&self) -> Result<Vec<TreeNode>, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;
        Self::query_node_list(
            &conn,
            &format!("SELECT {} FROM nodes ORDER BY lft ASC", NODE_COLUMNS),
            (),
        )
        .await
    }

    async fn query_nodes(&self, bounds: Interval) -> Result<Vec<TreeNode>, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;
        Self::query_node_list(
            &conn,
            &format!(
                "SELECT {} FROM nodes WHERE lft > ?1 AND rgt < ?2 ORDER BY lft ASC",
                NODE_COLUMNS
            ),
            (bounds.left, bounds.right),
        )
        .await
    }

    async fn locate(&self, id: NodeId) -> Result<Option<NodeContext>, DatabaseError> {
        self.node_context(LOCATE_SQL, id).await
    }

    async fn subtree(&self, id: NodeId) -> Result<Option<NodeContext>, DatabaseError> {
        self.node_context(SUBTREE_SQL, id).await
    }

    async fn count_nodes(&self) -> Result<u64, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;
        let mut rows = conn
            .query("SELECT COUNT(*) FROM nodes", ())
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to count nodes: {}", e)))?;
        let count: i64 = match rows.next().await? {
            Some(row) => row.get(0)?,
            None => 0,
        };
        Ok(count.max(0) as u64)
    }

    async fn get_name(
        &self,
        node_id: NodeId,
        language: &str,
    ) -> Result<Option<NodeName>, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;
        let mut rows = conn
            .query(
                "SELECT node_id, language, node_name FROM node_names
                 WHERE node_id = ?1 AND language = ?2",
                (node_id, language),
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to get name: {}", e)))?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::row_to_name(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_names(&self, node_ids: &[NodeId]) -> Result<Vec<NodeName>, DatabaseError> {
        if node_ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.db.connect_with_timeout().await?;
        let placeholders = vec!["?"; node_ids.len()].join(", ");
        let params = Params::Positional(node_ids.iter().map(|id| Value::Integer(*id)).collect());

        let mut rows = conn
            .query(
                &format!(
                    "SELECT node_id, language, node_name FROM node_names
                     WHERE node_id IN ({}) ORDER BY node_id, language",
                    placeholders
                ),
                params,
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to get names: {}", e)))?;

        let mut names = Vec::new();
        while let Some(row) = rows.next().await? {
            names.push(Self::row_to_name(&row)?);
        }
        Ok(names)
    }
}
