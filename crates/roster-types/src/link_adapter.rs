//! Adapter that stores membership links between owners (organizations, applications)
//! and member users.

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::prelude::*;

/// Kind of owner a link points to. Each relation has its own link table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
	Organization,
	Application,
}

impl Relation {
	pub fn as_str(self) -> &'static str {
		match self {
			Relation::Organization => "organization",
			Relation::Application => "application",
		}
	}
}

impl std::fmt::Display for Relation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
	pub owner_id: Box<str>,
	pub member_id: Box<str>,
	pub roles: Vec<Box<str>>,
}

/// Link mutations computed for one member and one relation.
///
/// The three lists touch disjoint owner ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPlan {
	pub remove: Vec<Box<str>>,
	pub add: Vec<(Box<str>, Vec<Box<str>>)>,
	pub update: Vec<(Box<str>, Vec<Box<str>>)>,
}

impl LinkPlan {
	pub fn is_empty(&self) -> bool {
		self.remove.is_empty() && self.add.is_empty() && self.update.is_empty()
	}

	/// Number of link mutations in the plan
	pub fn len(&self) -> usize {
		self.remove.len() + self.add.len() + self.update.len()
	}
}

#[async_trait]
pub trait LinkAdapter: Debug + Send + Sync {
	/// Lists the links of a member for one relation
	async fn list_member_links(&self, relation: Relation, member_id: &str) -> ClResult<Vec<Link>>;

	async fn add_link(
		&self,
		relation: Relation,
		owner_id: &str,
		member_id: &str,
		roles: &[Box<str>],
	) -> ClResult<()>;

	/// Removes a link. Removing a missing link is not an error.
	async fn remove_link(&self, relation: Relation, owner_id: &str, member_id: &str) -> ClResult<()>;

	async fn update_link(
		&self,
		relation: Relation,
		owner_id: &str,
		member_id: &str,
		roles: &[Box<str>],
	) -> ClResult<()>;

	/// Applies a reconciliation plan: remove, then add, then update.
	///
	/// Mutations inside a phase run concurrently. This default gives no atomicity:
	/// a failing call aborts the remaining phases but earlier mutations stay applied.
	/// Adapters with transactions should override it.
	async fn apply_plan(&self, relation: Relation, member_id: &str, plan: &LinkPlan) -> ClResult<()> {
		try_join_all(
			plan.remove.iter().map(|owner_id| self.remove_link(relation, owner_id, member_id)),
		)
		.await?;
		try_join_all(
			plan.add
				.iter()
				.map(|(owner_id, roles)| self.add_link(relation, owner_id, member_id, roles)),
		)
		.await?;
		try_join_all(
			plan.update
				.iter()
				.map(|(owner_id, roles)| self.update_link(relation, owner_id, member_id, roles)),
		)
		.await?;
		Ok(())
	}
}

// vim: ts=4
