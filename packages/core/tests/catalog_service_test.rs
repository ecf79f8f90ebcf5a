//! End-to-end catalog tests over an on-disk libsql database
//!
//! Builds a small organisational tree and exercises every catalog operation
//! through the same store the server uses.

use anyhow::Result;
use nodetree_core::db::LibsqlStore;
use nodetree_core::models::NodeId;
use nodetree_core::services::{CatalogError, CatalogService};
use std::collections::BTreeMap;
use std::sync::Arc;
use tempfile::TempDir;

async fn create_test_service() -> Result<(CatalogService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let store = LibsqlStore::open(temp_dir.path().join("catalog.db")).await?;
    Ok((CatalogService::new(Arc::new(store)), temp_dir))
}

fn names(en: &str, it: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("en".to_string(), en.to_string()),
        ("it".to_string(), it.to_string()),
    ])
}

async fn create(
    service: &CatalogService,
    parent: Option<NodeId>,
    en: &str,
    it: &str,
) -> Result<NodeId> {
    Ok(service.create_node(parent, names(en, it)).await?.node.id)
}

#[tokio::test]
async fn test_company_tree_end_to_end() -> Result<()> {
    let (service, _temp_dir) = create_test_service().await?;

    let company = create(&service, None, "Company", "Azienda").await?;
    let helpdesk = create(&service, Some(company), "Helpdesk", "Supporto tecnico").await?;
    let sales = create(&service, Some(company), "Sales", "Supporto Vendite").await?;
    let italy = create(&service, Some(sales), "Italy", "Italia").await?;
    let europe = create(&service, Some(sales), "Europe", "").await?;

    let children = service.search_children(company, 0, 10, "it").await?;
    assert_eq!(children.parent_name, "Azienda");
    let labels: Vec<&str> = children.children.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(labels, vec!["Supporto tecnico", "Supporto Vendite"]);

    let children = service.search_children(sales, 0, 10, "it").await?;
    let labels: Vec<(NodeId, &str)> = children
        .children
        .iter()
        .map(|n| (n.id, n.name.as_str()))
        .collect();
    assert_eq!(labels, vec![(italy, "Italia"), (europe, "Europe")]);

    let listing = service.list_nodes(0, 2, "en").await?;
    assert_eq!(listing.pagination.total_items, 5);
    assert_eq!(listing.pagination.total_pages, 3);
    let first: Vec<NodeId> = listing.nodes.iter().map(|n| n.id).collect();
    assert_eq!(first, vec![company, helpdesk]);

    let root = service.get_node(company, "en").await?;
    assert_eq!((root.left, root.right), (1, 10));
    assert_eq!(root.children_count, 2);
    assert_eq!(root.depth, 4);
    assert_eq!(root.level, 0);

    let report = service.verify_tree().await?;
    assert_eq!(report.node_count, 5);
    assert_eq!(report.root_count, 1);
    Ok(())
}

#[tokio::test]
async fn test_not_found_propagation() -> Result<()> {
    let (service, _temp_dir) = create_test_service().await?;

    let err = service
        .create_node(Some(999), names("Ghost", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { id: 999 }));
    assert_eq!(service.store().count_nodes().await?, 0);

    let err = service.get_node(999, "en").await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { id: 999 }));
    Ok(())
}

#[tokio::test]
async fn test_second_root_does_not_collide() -> Result<()> {
    let (service, _temp_dir) = create_test_service().await?;

    let first = create(&service, None, "First", "Primo").await?;
    create(&service, Some(first), "Child", "Figlio").await?;
    let second = create(&service, None, "Second", "Secondo").await?;

    let second = service.get_node(second, "en").await?;
    assert_eq!((second.left, second.right), (5, 6));
    service.verify_tree().await?;
    Ok(())
}
