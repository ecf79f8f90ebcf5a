//! Display name resolution with language fallback.
//!
//! Resolution is total: a requested language, then each fallback language in
//! order, then a synthesized `"Node {id}"` placeholder.

use crate::models::{NodeId, NodeName};
use std::collections::HashMap;

/// Language used when the caller does not ask for one
pub const DEFAULT_LANGUAGE: &str = "en";

/// Tried in order after the requested language
pub const FALLBACK_LANGUAGES: &[&str] = &[DEFAULT_LANGUAGE];

/// Placeholder for a node without any usable name
pub fn placeholder_name(id: NodeId) -> String {
    format!("Node {}", id)
}

/// Languages to try for a request, requested language first, without repeats
pub fn lookup_order(language: &str) -> Vec<&str> {
    let mut order = vec![language];
    order.extend(FALLBACK_LANGUAGES.iter().copied().filter(|l| *l != language));
    order
}

/// Resolve a display name from one node's `language -> text` set
pub fn resolve_name(id: NodeId, names: Option<&HashMap<String, String>>, language: &str) -> String {
    names
        .and_then(|names| {
            lookup_order(language)
                .into_iter()
                .find_map(|lang| names.get(lang))
        })
        .cloned()
        .unwrap_or_else(|| placeholder_name(id))
}

/// Names for a batch of nodes, indexed for repeated resolution
#[derive(Debug, Default)]
pub struct NameIndex {
    by_node: HashMap<NodeId, HashMap<String, String>>,
}

impl NameIndex {
    pub fn from_names(names: Vec<NodeName>) -> Self {
        let mut by_node: HashMap<NodeId, HashMap<String, String>> = HashMap::new();
        for name in names {
            by_node
                .entry(name.node_id)
                .or_default()
                .insert(name.language, name.text);
        }
        Self { by_node }
    }

    pub fn resolve(&self, id: NodeId, language: &str) -> String {
        resolve_name(id, self.by_node.get(&id), language)
    }
}
