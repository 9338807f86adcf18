//! Membership link tests
#![allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]

use roster_types::link_adapter::{LinkAdapter, LinkPlan, Relation};
use roster_types::prelude::*;
use roster_user_adapter_sqlite::UserAdapterSqlite;
use tempfile::TempDir;

async fn create_test_adapter() -> (UserAdapterSqlite, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter = UserAdapterSqlite::new(temp_dir.path()).await.expect("Failed to create adapter");
	(adapter, temp_dir)
}

fn roles(list: &[&str]) -> Vec<Box<str>> {
	list.iter().map(|s| Box::from(*s)).collect()
}

async fn owners(adapter: &UserAdapterSqlite, relation: Relation, member_id: &str) -> Vec<String> {
	let mut ids: Vec<String> = adapter
		.list_member_links(relation, member_id)
		.await
		.unwrap()
		.into_iter()
		.map(|l| l.owner_id.into())
		.collect();
	ids.sort();
	ids
}

#[tokio::test]
async fn test_add_update_remove() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter.add_link(Relation::Organization, "org1", "u1", &roles(&["admin"])).await.unwrap();
	adapter.add_link(Relation::Organization, "org2", "u1", &[]).await.unwrap();
	adapter.update_link(Relation::Organization, "org2", "u1", &roles(&["member"])).await.unwrap();

	let links = adapter.list_member_links(Relation::Organization, "u1").await.unwrap();
	assert_eq!(links.len(), 2);
	assert_eq!(links[0].owner_id.as_ref(), "org1");
	assert_eq!(links[0].roles, roles(&["admin"]));
	assert_eq!(links[1].roles, roles(&["member"]));

	adapter.remove_link(Relation::Organization, "org1", "u1").await.unwrap();
	// Removing again is not an error
	adapter.remove_link(Relation::Organization, "org1", "u1").await.unwrap();
	assert_eq!(owners(&adapter, Relation::Organization, "u1").await, ["org2"]);
}

#[tokio::test]
async fn test_one_link_per_pair() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter.add_link(Relation::Application, "app1", "u1", &roles(&["a"])).await.unwrap();
	adapter.add_link(Relation::Application, "app1", "u1", &roles(&["b"])).await.unwrap();

	let links = adapter.list_member_links(Relation::Application, "u1").await.unwrap();
	assert_eq!(links.len(), 1);
	assert_eq!(links[0].roles, roles(&["b"]));
}

#[tokio::test]
async fn test_update_missing_link() {
	let (adapter, _temp) = create_test_adapter().await;
	let res = adapter.update_link(Relation::Organization, "org1", "u1", &[]).await;
	assert!(matches!(res, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_relations_are_separate() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter.add_link(Relation::Organization, "x1", "u1", &[]).await.unwrap();
	adapter.add_link(Relation::Application, "x1", "u1", &[]).await.unwrap();
	adapter.remove_link(Relation::Organization, "x1", "u1").await.unwrap();

	assert!(owners(&adapter, Relation::Organization, "u1").await.is_empty());
	assert_eq!(owners(&adapter, Relation::Application, "u1").await, ["x1"]);
}

#[tokio::test]
async fn test_apply_plan() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.add_link(Relation::Organization, "org1", "u1", &[]).await.unwrap();
	adapter.add_link(Relation::Organization, "org2", "u1", &[]).await.unwrap();

	let plan = LinkPlan {
		remove: roles(&["org2"]),
		add: vec![("org3".into(), roles(&["member"]))],
		update: vec![("org1".into(), roles(&["owner"]))],
	};
	adapter.apply_plan(Relation::Organization, "u1", &plan).await.unwrap();

	assert_eq!(owners(&adapter, Relation::Organization, "u1").await, ["org1", "org3"]);
	let links = adapter.list_member_links(Relation::Organization, "u1").await.unwrap();
	let org1 = links.iter().find(|l| l.owner_id.as_ref() == "org1").unwrap();
	assert_eq!(org1.roles, roles(&["owner"]));
}

#[tokio::test]
async fn test_failed_plan_rolls_back() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.add_link(Relation::Organization, "org1", "u1", &[]).await.unwrap();

	// The update targets a link that does not exist, so the whole plan fails
	let plan = LinkPlan {
		remove: roles(&["org1"]),
		add: vec![("org2".into(), Vec::new())],
		update: vec![("org9".into(), Vec::new())],
	};
	let res = adapter.apply_plan(Relation::Organization, "u1", &plan).await;
	assert!(matches!(res, Err(Error::NotFound)));

	assert_eq!(owners(&adapter, Relation::Organization, "u1").await, ["org1"]);
}

// vim: ts=4
