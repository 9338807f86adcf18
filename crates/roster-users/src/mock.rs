//! In-memory adapters for unit tests

use async_trait::async_trait;
use parking_lot::Mutex;

use roster_types::hasher::PasswordHasher;
use roster_types::link_adapter::{Link, LinkAdapter, Relation};
use roster_types::user_adapter::{
	CreateUserData, ListUserOptions, UpdateUserData, User, UserAdapter, UserField, UserStatus,
};

use crate::prelude::*;

type LinkCall = (Relation, Box<str>, Box<str>, Vec<Box<str>>);

/// Link mutations seen by the store, in call order
#[derive(Debug, Clone, Default)]
pub struct LinkCalls {
	pub added: Vec<LinkCall>,
	pub removed: Vec<(Relation, Box<str>, Box<str>)>,
	pub updated: Vec<LinkCall>,
}

#[derive(Debug, Default)]
struct Inner {
	users: Vec<User>,
	links: Vec<(Relation, Link)>,
	calls: LinkCalls,
	fail_links: bool,
	tick: i64,
}

#[derive(Debug, Default)]
pub struct MockStore {
	inner: Mutex<Inner>,
}

impl MockStore {
	pub fn seed_link(&self, relation: Relation, owner_id: &str, member_id: &str, roles: &[&str]) {
		self.inner.lock().links.push((
			relation,
			Link {
				owner_id: owner_id.into(),
				member_id: member_id.into(),
				roles: roles.iter().map(|r| Box::from(*r)).collect(),
			},
		));
	}

	/// Makes every later link mutation fail with `DbError`
	pub fn fail_links(&self) {
		self.inner.lock().fail_links = true;
	}

	pub fn calls(&self) -> LinkCalls {
		self.inner.lock().calls.clone()
	}

	pub fn clear_calls(&self) {
		self.inner.lock().calls = LinkCalls::default();
	}

	pub fn user(&self, user_id: &str) -> Option<User> {
		self.inner.lock().users.iter().find(|u| u.id.as_ref() == user_id).cloned()
	}
}

fn field_value(user: &User, field: UserField) -> Option<&str> {
	match field {
		UserField::Id => Some(user.id.as_ref()),
		UserField::Username => user.username.as_deref(),
		UserField::Email => user.email.as_deref(),
		UserField::FirstName => user.first_name.as_deref(),
		UserField::LastName => user.last_name.as_deref(),
		UserField::Bio => user.bio.as_deref(),
		UserField::Timezone => user.timezone.as_deref(),
		UserField::FacebookUrl => user.facebook_url.as_deref(),
		UserField::TwitterUrl => user.twitter_url.as_deref(),
		UserField::ImageId => user.image_id.as_deref(),
	}
}

fn holds(
	users: &[User],
	except: Option<&str>,
	value: &str,
	get: fn(&User) -> Option<&str>,
) -> bool {
	users.iter().any(|u| {
		u.status == UserStatus::Active
			&& Some(u.id.as_ref()) != except
			&& get(u).is_some_and(|v| v.eq_ignore_ascii_case(value))
	})
}

fn check_unique(
	users: &[User],
	except: Option<&str>,
	email: Option<&str>,
	username: Option<&str>,
) -> ClResult<()> {
	if email.is_some_and(|email| holds(users, except, email, |u| u.email.as_deref())) {
		return Err(Error::Duplicate(UniqueField::Email));
	}
	if username.is_some_and(|name| holds(users, except, name, |u| u.username.as_deref())) {
		return Err(Error::Duplicate(UniqueField::Username));
	}
	Ok(())
}

fn apply<T: Clone>(target: &mut Option<T>, patch: &Patch<T>) {
	match patch {
		Patch::Undefined => {}
		Patch::Null => *target = None,
		Patch::Value(v) => *target = Some(v.clone()),
	}
}

fn apply_list(target: &mut Vec<Box<str>>, patch: &Patch<Vec<Box<str>>>) {
	match patch {
		Patch::Undefined => {}
		Patch::Null => target.clear(),
		Patch::Value(v) => target.clone_from(v),
	}
}

#[async_trait]
impl UserAdapter for MockStore {
	async fn create_user(&self, data: &CreateUserData) -> ClResult<()> {
		let mut inner = self.inner.lock();
		check_unique(&inner.users, None, data.email.as_deref(), data.username.as_deref())?;

		inner.tick += 1;
		let now = Timestamp(inner.tick);
		inner.users.push(User {
			id: data.id.clone(),
			username: data.username.clone(),
			email: data.email.clone(),
			password_hash: data.password_hash.clone(),
			first_name: data.first_name.clone(),
			last_name: data.last_name.clone(),
			bio: data.bio.clone(),
			timezone: data.timezone.clone(),
			facebook_url: data.facebook_url.clone(),
			twitter_url: data.twitter_url.clone(),
			image_id: data.image_id.clone(),
			roles: data.roles.clone(),
			status: UserStatus::Active,
			organization_ids: Vec::new(),
			application_ids: Vec::new(),
			created_at: now,
			updated_at: now,
		});
		Ok(())
	}

	async fn read_user(&self, user_id: &str) -> ClResult<User> {
		self.inner
			.lock()
			.users
			.iter()
			.find(|u| u.id.as_ref() == user_id && u.status != UserStatus::Destroyed)
			.cloned()
			.ok_or(Error::NotFound)
	}

	async fn find_user(&self, field: UserField, value: &str) -> ClResult<Option<User>> {
		Ok(self
			.inner
			.lock()
			.users
			.iter()
			.filter(|u| u.status == UserStatus::Active)
			.find(|u| field_value(u, field).is_some_and(|v| v.to_lowercase() == value.to_lowercase()))
			.cloned())
	}

	async fn list_users(&self, opts: &ListUserOptions) -> ClResult<Vec<User>> {
		let status = opts.status.unwrap_or(UserStatus::Active);
		Ok(self
			.inner
			.lock()
			.users
			.iter()
			.filter(|u| u.status == status && u.status != UserStatus::Destroyed)
			.skip(opts.offset.unwrap_or(0) as usize)
			.take(opts.limit.map_or(usize::MAX, |l| l as usize))
			.cloned()
			.collect())
	}

	async fn update_user(&self, user_id: &str, data: &UpdateUserData) -> ClResult<()> {
		let mut inner = self.inner.lock();
		check_unique(
			&inner.users,
			Some(user_id),
			data.email.value().map(AsRef::as_ref),
			data.username.value().map(AsRef::as_ref),
		)?;

		inner.tick += 1;
		let now = Timestamp(inner.tick);
		let user = inner
			.users
			.iter_mut()
			.find(|u| u.id.as_ref() == user_id)
			.ok_or(Error::NotFound)?;

		apply(&mut user.username, &data.username);
		apply(&mut user.email, &data.email);
		apply(&mut user.password_hash, &data.password_hash);
		apply(&mut user.first_name, &data.first_name);
		apply(&mut user.last_name, &data.last_name);
		apply(&mut user.bio, &data.bio);
		apply(&mut user.timezone, &data.timezone);
		apply(&mut user.facebook_url, &data.facebook_url);
		apply(&mut user.twitter_url, &data.twitter_url);
		apply(&mut user.image_id, &data.image_id);
		apply_list(&mut user.roles, &data.roles);
		apply_list(&mut user.organization_ids, &data.organization_ids);
		apply_list(&mut user.application_ids, &data.application_ids);
		if let Patch::Value(status) = data.status {
			user.status = status;
		}
		user.updated_at = now;
		Ok(())
	}
}

#[async_trait]
impl LinkAdapter for MockStore {
	async fn list_member_links(&self, relation: Relation, member_id: &str) -> ClResult<Vec<Link>> {
		Ok(self
			.inner
			.lock()
			.links
			.iter()
			.filter(|(rel, link)| *rel == relation && link.member_id.as_ref() == member_id)
			.map(|(_, link)| link.clone())
			.collect())
	}

	async fn add_link(
		&self,
		relation: Relation,
		owner_id: &str,
		member_id: &str,
		roles: &[Box<str>],
	) -> ClResult<()> {
		let mut inner = self.inner.lock();
		if inner.fail_links {
			return Err(Error::DbError);
		}
		inner.calls.added.push((relation, owner_id.into(), member_id.into(), roles.to_vec()));
		inner.links.push((
			relation,
			Link { owner_id: owner_id.into(), member_id: member_id.into(), roles: roles.to_vec() },
		));
		Ok(())
	}

	async fn remove_link(&self, relation: Relation, owner_id: &str, member_id: &str) -> ClResult<()> {
		let mut inner = self.inner.lock();
		if inner.fail_links {
			return Err(Error::DbError);
		}
		inner.calls.removed.push((relation, owner_id.into(), member_id.into()));
		inner.links.retain(|(rel, link)| {
			!(*rel == relation
				&& link.owner_id.as_ref() == owner_id
				&& link.member_id.as_ref() == member_id)
		});
		Ok(())
	}

	async fn update_link(
		&self,
		relation: Relation,
		owner_id: &str,
		member_id: &str,
		roles: &[Box<str>],
	) -> ClResult<()> {
		let mut inner = self.inner.lock();
		if inner.fail_links {
			return Err(Error::DbError);
		}
		inner.calls.updated.push((relation, owner_id.into(), member_id.into(), roles.to_vec()));
		let link = inner
			.links
			.iter_mut()
			.find(|(rel, link)| {
				*rel == relation
					&& link.owner_id.as_ref() == owner_id
					&& link.member_id.as_ref() == member_id
			})
			.ok_or(Error::NotFound)?;
		link.1.roles = roles.to_vec();
		Ok(())
	}
}

/// Hasher producing a recognizable, non-plaintext value
#[derive(Debug, Default)]
pub struct FakeHasher;

#[async_trait]
impl PasswordHasher for FakeHasher {
	async fn hash_password(&self, password: Box<str>) -> ClResult<Box<str>> {
		Ok(format!("hashed:{}", password.len()).into())
	}
}

// vim: ts=4
