//! Membership reconciliation.
//!
//! Brings the links of one user for one relation in line with a desired set of
//! owner ids. Ids present on both sides are re-written with their (possibly empty)
//! roles, new ids are added and missing ones are removed.

use std::collections::{HashMap, HashSet};

use roster_types::link_adapter::{LinkAdapter, LinkPlan, Relation};

use crate::prelude::*;

pub type RolesById = HashMap<Box<str>, Vec<Box<str>>>;

/// Desired memberships of a user for one relation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipSet {
	/// Owner ids in request order, without duplicates
	pub ids: Vec<Box<str>>,
	/// Roles per owner id. Owners missing here get no roles.
	pub roles_by_id: RolesById,
}

impl MembershipSet {
	pub fn new(ids: Vec<Box<str>>) -> Self {
		Self { ids, roles_by_id: RolesById::new() }
	}

	pub fn with_roles(mut self, owner_id: &str, roles: Vec<Box<str>>) -> Self {
		self.roles_by_id.insert(owner_id.into(), roles);
		self
	}

	pub fn roles_of(&self, owner_id: &str) -> Vec<Box<str>> {
		self.roles_by_id.get(owner_id).cloned().unwrap_or_default()
	}
}

/// Computes the link mutations that turn `current` into `desired`
pub fn plan_links(current: &[Box<str>], desired: &MembershipSet) -> LinkPlan {
	let desired_ids: HashSet<&str> = desired.ids.iter().map(AsRef::as_ref).collect();
	let current_ids: HashSet<&str> = current.iter().map(AsRef::as_ref).collect();

	let mut plan = LinkPlan::default();
	for owner_id in current {
		if !desired_ids.contains(owner_id.as_ref()) {
			plan.remove.push(owner_id.clone());
		}
	}
	for owner_id in &desired.ids {
		let entry = (owner_id.clone(), desired.roles_of(owner_id));
		if current_ids.contains(owner_id.as_ref()) {
			plan.update.push(entry);
		} else {
			plan.add.push(entry);
		}
	}
	plan
}

/// Reconciles against the links currently stored for the member.
///
/// Returns the desired id list, which callers store as the denormalized membership field.
pub async fn reconcile_links(
	links: &dyn LinkAdapter,
	relation: Relation,
	member_id: &str,
	desired: &MembershipSet,
) -> ClResult<Vec<Box<str>>> {
	let current: Vec<Box<str>> = links
		.list_member_links(relation, member_id)
		.await?
		.into_iter()
		.map(|link| link.owner_id)
		.collect();

	reconcile_links_from(links, relation, member_id, &current, desired).await
}

/// Reconciles against a known current id list (empty for a new user)
pub async fn reconcile_links_from(
	links: &dyn LinkAdapter,
	relation: Relation,
	member_id: &str,
	current: &[Box<str>],
	desired: &MembershipSet,
) -> ClResult<Vec<Box<str>>> {
	let plan = plan_links(current, desired);
	debug!(
		"reconcile {} links of {}: -{} +{} ~{}",
		relation,
		member_id,
		plan.remove.len(),
		plan.add.len(),
		plan.update.len()
	);

	if !plan.is_empty() {
		links.apply_plan(relation, member_id, &plan).await?;
	}

	Ok(desired.ids.clone())
}


// vim: ts=4
