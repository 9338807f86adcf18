//! User service: record lifecycle and membership orchestration.

use std::sync::Arc;

use roster_core::RegistrationMode;
use roster_types::extract::TenantCtx;
use roster_types::hasher::PasswordHasher;
use roster_types::link_adapter::{LinkAdapter, Relation};
use roster_types::user_adapter::{
	CreateUserData, ListUserOptions, UpdateUserData, User, UserAdapter, UserField, UserStatus,
};
use roster_types::utils::{normalize, random_id};

use crate::prelude::*;
use crate::reconcile::{MembershipSet, reconcile_links, reconcile_links_from};
use crate::validate::{CreateUserInput, ProfilePatch, UserPatch};

/// Keys the existence check refuses to search
const EXISTENCE_BLACKLIST: [&str; 3] = ["hash", "password", "passwordHash"];

#[derive(Debug, Clone)]
pub struct UserService {
	users: Arc<dyn UserAdapter>,
	links: Arc<dyn LinkAdapter>,
	hasher: Arc<dyn PasswordHasher>,
	mode: RegistrationMode,
}

fn is_blank(value: Option<&str>) -> bool {
	value.is_none_or(|v| v.trim().is_empty())
}

/// New value of a unique field, if it differs from the stored one
fn changed<'a>(new: &'a Patch<Box<str>>, old: Option<&str>) -> Option<&'a str> {
	new.value().map(AsRef::as_ref).filter(|v| Some(*v) != old)
}

/// Adds the single owner reference of a create request to its membership list.
///
/// The reference alone yields a one-id set. It gets roles only from the list's role map.
fn with_reference(set: Option<MembershipSet>, reference: Option<Box<str>>) -> Option<MembershipSet> {
	match (set, reference) {
		(Some(mut set), Some(owner_id)) => {
			if !set.ids.contains(&owner_id) {
				set.ids.push(owner_id);
			}
			Some(set)
		}
		(None, Some(owner_id)) => Some(MembershipSet::new(vec![owner_id])),
		(set, None) => set,
	}
}

fn profile_update(profile: ProfilePatch) -> UpdateUserData {
	UpdateUserData {
		first_name: profile.first_name,
		last_name: profile.last_name,
		bio: profile.bio,
		timezone: profile.timezone,
		facebook_url: profile.facebook_url,
		twitter_url: profile.twitter_url,
		image_id: profile.image_id,
		..UpdateUserData::default()
	}
}

impl UserService {
	pub fn new(
		users: Arc<dyn UserAdapter>,
		links: Arc<dyn LinkAdapter>,
		hasher: Arc<dyn PasswordHasher>,
		mode: RegistrationMode,
	) -> Self {
		Self { users, links, hasher, mode }
	}

	pub fn from_app(app: &App) -> Self {
		Self::new(
			app.user_adapter.clone(),
			app.link_adapter.clone(),
			app.hasher.clone(),
			app.opts.registration_mode,
		)
	}

	pub fn mode(&self) -> RegistrationMode {
		self.mode
	}

	/// Fails with `Duplicate` if another active user holds the email or username.
	///
	/// Email is checked first. `except` excludes the user being updated.
	async fn check_duplicates(
		&self,
		email: Option<&str>,
		username: Option<&str>,
		except: Option<&str>,
	) -> ClResult<()> {
		let taken = |user: Option<User>| user.is_some_and(|u| Some(u.id.as_ref()) != except);

		if let Some(email) = email
			&& taken(self.users.find_user(UserField::Email, email).await?)
		{
			return Err(Error::Duplicate(UniqueField::Email));
		}
		if let Some(username) = username
			&& taken(self.users.find_user(UserField::Username, username).await?)
		{
			return Err(Error::Duplicate(UniqueField::Username));
		}
		Ok(())
	}

	/// Reconciles both relations and returns the id lists to store on the record
	async fn reconcile_memberships(
		&self,
		user_id: &str,
		organizations: Option<&MembershipSet>,
		applications: Option<&MembershipSet>,
		fresh: bool,
	) -> ClResult<UpdateUserData> {
		let mut data = UpdateUserData::default();

		for (relation, desired) in
			[(Relation::Organization, organizations), (Relation::Application, applications)]
		{
			let Some(desired) = desired else { continue };
			let ids = if fresh {
				reconcile_links_from(self.links.as_ref(), relation, user_id, &[], desired).await?
			} else {
				reconcile_links(self.links.as_ref(), relation, user_id, desired).await?
			};
			match relation {
				Relation::Organization => data.organization_ids = Patch::Value(ids),
				Relation::Application => data.application_ids = Patch::Value(ids),
			}
		}

		Ok(data)
	}

	/// Creates a user, optionally linking it to organizations and applications
	pub async fn create(&self, input: CreateUserInput, tenant: &TenantCtx) -> ClResult<User> {
		let organization_ref = input
			.organization_id
			.clone()
			.or_else(|| tenant.organization_id.clone())
			.filter(|id| !id.trim().is_empty());
		let application_ref = input
			.application_id
			.clone()
			.or_else(|| tenant.application_id.clone())
			.filter(|id| !id.trim().is_empty());
		let organizations = with_reference(input.organizations, organization_ref);
		let applications = with_reference(input.applications, application_ref);

		if self.mode == RegistrationMode::Strict {
			if is_blank(input.username.as_deref()) {
				return Err(Error::InvalidField(Field::Username));
			}
			if is_blank(input.email.as_deref()) {
				return Err(Error::InvalidField(Field::Email));
			}
			if is_blank(input.password.as_deref()) {
				return Err(Error::InvalidField(Field::Password));
			}
			if organizations.as_ref().is_none_or(|set| set.ids.is_empty()) {
				return Err(Error::InvalidField(Field::OrganizationId));
			}
			self.check_duplicates(input.email.as_deref(), input.username.as_deref(), None).await?;
		}

		let password_hash = match input.password {
			Some(password) => Some(self.hasher.hash_password(password).await?),
			None => None,
		};

		let user_id = random_id();
		self.users
			.create_user(&CreateUserData {
				id: user_id.clone(),
				username: input.username,
				email: input.email,
				password_hash,
				first_name: input.first_name,
				last_name: input.last_name,
				bio: input.bio,
				timezone: input.timezone,
				facebook_url: input.facebook_url,
				twitter_url: input.twitter_url,
				image_id: input.image_id,
				roles: input.roles,
			})
			.await?;
		info!(user_id = %user_id, mode = %self.mode, "user created");

		let memberships = self
			.reconcile_memberships(&user_id, organizations.as_ref(), applications.as_ref(), true)
			.await?;
		if !memberships.is_empty() {
			self.users.update_user(&user_id, &memberships).await?;
		}

		self.users.read_user(&user_id).await
	}

	pub async fn get_by_id(&self, user_id: &str) -> ClResult<User> {
		self.users.read_user(user_id).await
	}

	/// Lists active users, or deleted ones on request. Destroyed users are never listed.
	pub async fn get_all(&self, opts: &ListUserOptions) -> ClResult<Vec<User>> {
		if opts.status == Some(UserStatus::Destroyed) {
			return Err(Error::ValidationError("Destroyed users cannot be listed".into()));
		}
		self.users.list_users(opts).await
	}

	pub async fn get_by_email(&self, email: &str) -> ClResult<User> {
		self.users.find_user(UserField::Email, &normalize(email)).await?.ok_or(Error::NotFound)
	}

	pub async fn get_by_username(&self, username: &str) -> ClResult<User> {
		self.users
			.find_user(UserField::Username, &normalize(username))
			.await?
			.ok_or(Error::NotFound)
	}

	/// Applies a partial update and reconciles the memberships present in the patch
	pub async fn update_by_id(&self, user_id: &str, patch: UserPatch) -> ClResult<User> {
		let current = self.users.read_user(user_id).await?;
		if current.status != UserStatus::Active {
			return Err(Error::NotFound);
		}

		self.check_duplicates(
			changed(&patch.email, current.email.as_deref()),
			changed(&patch.username, current.username.as_deref()),
			Some(user_id),
		)
		.await?;

		let password_hash = match patch.password {
			Some(password) => Patch::Value(self.hasher.hash_password(password).await?),
			None => Patch::Undefined,
		};

		let data = UpdateUserData {
			username: patch.username,
			email: patch.email,
			password_hash,
			roles: patch.roles,
			..profile_update(patch.profile)
		};
		if !data.is_empty() {
			self.users.update_user(user_id, &data).await?;
		}

		let memberships = self
			.reconcile_memberships(
				user_id,
				patch.organizations.as_ref(),
				patch.applications.as_ref(),
				false,
			)
			.await?;
		if !memberships.is_empty() {
			self.users.update_user(user_id, &memberships).await?;
		}
		debug!(user_id = %user_id, "user updated");

		self.users.read_user(user_id).await
	}

	/// Updates profile fields only
	pub async fn update_profile(&self, user_id: &str, profile: ProfilePatch) -> ClResult<User> {
		let current = self.users.read_user(user_id).await?;
		if current.status != UserStatus::Active {
			return Err(Error::NotFound);
		}

		let data = profile_update(profile);
		if data.is_empty() {
			return Ok(current);
		}
		self.users.update_user(user_id, &data).await?;
		self.users.read_user(user_id).await
	}

	/// Removes every membership link of the user and moves it to `status`
	async fn retire(&self, user_id: &str, status: UserStatus) -> ClResult<()> {
		// Fails with NotFound before any link is touched
		self.users.read_user(user_id).await?;

		let none = MembershipSet::default();
		let mut data = self.reconcile_memberships(user_id, Some(&none), Some(&none), false).await?;
		data.status = Patch::Value(status);
		self.users.update_user(user_id, &data).await?;

		info!(user_id = %user_id, status = status.as_str(), "user retired");
		Ok(())
	}

	/// Soft delete. The record stays readable by id.
	pub async fn delete_by_id(&self, user_id: &str) -> ClResult<User> {
		self.retire(user_id, UserStatus::Deleted).await?;
		self.users.read_user(user_id).await
	}

	/// Hard destroy. The record is no longer readable afterwards.
	pub async fn destroy_by_id(&self, user_id: &str) -> ClResult<()> {
		self.retire(user_id, UserStatus::Destroyed).await
	}

	/// Reports whether an active user has `key` equal to `value`, ignoring case
	pub async fn exists(&self, key: &str, value: &str) -> ClResult<bool> {
		if key.is_empty() || EXISTENCE_BLACKLIST.contains(&key) {
			return Err(Error::InvalidKey);
		}
		let field = UserField::from_key(key).ok_or(Error::InvalidKey)?;
		if value.trim().is_empty() {
			return Err(Error::InvalidValue);
		}

		Ok(self.users.find_user(field, &normalize(value)).await?.is_some())
	}
}


// vim: ts=4
