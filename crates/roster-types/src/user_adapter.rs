//! Adapter that stores user records.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
	Active,
	Deleted,
	Destroyed,
}

impl UserStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			UserStatus::Active => "active",
			UserStatus::Deleted => "deleted",
			UserStatus::Destroyed => "destroyed",
		}
	}

	pub fn parse(s: &str) -> Option<Self> {
		match s {
			"active" => Some(UserStatus::Active),
			"deleted" => Some(UserStatus::Deleted),
			"destroyed" => Some(UserStatus::Destroyed),
			_ => None,
		}
	}
}

/// A stored user record.
///
/// Holds the password hash, so it is never serialized directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
	pub id: Box<str>,
	pub username: Option<Box<str>>,
	pub email: Option<Box<str>>,
	pub password_hash: Option<Box<str>>,
	pub first_name: Option<Box<str>>,
	pub last_name: Option<Box<str>>,
	pub bio: Option<Box<str>>,
	pub timezone: Option<Box<str>>,
	pub facebook_url: Option<Box<str>>,
	pub twitter_url: Option<Box<str>>,
	pub image_id: Option<Box<str>>,
	pub roles: Vec<Box<str>>,
	pub status: UserStatus,
	/// Denormalized owner ids of the organization links, in the order they were applied
	pub organization_ids: Vec<Box<str>>,
	/// Denormalized owner ids of the application links
	pub application_ids: Vec<Box<str>>,
	pub created_at: Timestamp,
	pub updated_at: Timestamp,
}

/// Data needed to insert a new user. Username and email are already lowercased.
#[derive(Debug, Clone, Default)]
pub struct CreateUserData {
	pub id: Box<str>,
	pub username: Option<Box<str>>,
	pub email: Option<Box<str>>,
	pub password_hash: Option<Box<str>>,
	pub first_name: Option<Box<str>>,
	pub last_name: Option<Box<str>>,
	pub bio: Option<Box<str>>,
	pub timezone: Option<Box<str>>,
	pub facebook_url: Option<Box<str>>,
	pub twitter_url: Option<Box<str>>,
	pub image_id: Option<Box<str>>,
	pub roles: Vec<Box<str>>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserData {
	pub username: Patch<Box<str>>,
	pub email: Patch<Box<str>>,
	pub password_hash: Patch<Box<str>>,
	pub first_name: Patch<Box<str>>,
	pub last_name: Patch<Box<str>>,
	pub bio: Patch<Box<str>>,
	pub timezone: Patch<Box<str>>,
	pub facebook_url: Patch<Box<str>>,
	pub twitter_url: Patch<Box<str>>,
	pub image_id: Patch<Box<str>>,
	pub roles: Patch<Vec<Box<str>>>,
	pub status: Patch<UserStatus>,
	pub organization_ids: Patch<Vec<Box<str>>>,
	pub application_ids: Patch<Vec<Box<str>>>,
}

impl UpdateUserData {
	pub fn is_empty(&self) -> bool {
		self.username.is_undefined()
			&& self.email.is_undefined()
			&& self.password_hash.is_undefined()
			&& self.first_name.is_undefined()
			&& self.last_name.is_undefined()
			&& self.bio.is_undefined()
			&& self.timezone.is_undefined()
			&& self.facebook_url.is_undefined()
			&& self.twitter_url.is_undefined()
			&& self.image_id.is_undefined()
			&& self.roles.is_undefined()
			&& self.status.is_undefined()
			&& self.organization_ids.is_undefined()
			&& self.application_ids.is_undefined()
	}
}

#[derive(Debug, Clone, Default)]
pub struct ListUserOptions {
	/// Defaults to active users
	pub status: Option<UserStatus>,
	pub limit: Option<u32>,
	pub offset: Option<u32>,
}

/// Searchable user columns.
///
/// Password hashes are deliberately not representable here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserField {
	Id,
	Username,
	Email,
	FirstName,
	LastName,
	Bio,
	Timezone,
	FacebookUrl,
	TwitterUrl,
	ImageId,
}

impl UserField {
	/// Map a payload key to a searchable field
	pub fn from_key(key: &str) -> Option<Self> {
		match key {
			"id" => Some(UserField::Id),
			"username" => Some(UserField::Username),
			"email" => Some(UserField::Email),
			"firstName" => Some(UserField::FirstName),
			"lastName" => Some(UserField::LastName),
			"bio" => Some(UserField::Bio),
			"timezone" => Some(UserField::Timezone),
			"facebookUrl" => Some(UserField::FacebookUrl),
			"twitterUrl" => Some(UserField::TwitterUrl),
			"imageId" => Some(UserField::ImageId),
			_ => None,
		}
	}

	pub fn column(self) -> &'static str {
		match self {
			UserField::Id => "user_id",
			UserField::Username => "username",
			UserField::Email => "email",
			UserField::FirstName => "first_name",
			UserField::LastName => "last_name",
			UserField::Bio => "bio",
			UserField::Timezone => "timezone",
			UserField::FacebookUrl => "facebook_url",
			UserField::TwitterUrl => "twitter_url",
			UserField::ImageId => "image_id",
		}
	}
}

#[async_trait]
pub trait UserAdapter: Debug + Send + Sync {
	/// Inserts a new active user.
	///
	/// Fails with `Error::Duplicate` if an active user already has the email or username.
	async fn create_user(&self, user: &CreateUserData) -> ClResult<()>;

	/// Reads a user by id. Soft-deleted users are returned, destroyed ones are `NotFound`.
	async fn read_user(&self, user_id: &str) -> ClResult<User>;

	/// Finds an active user by a field value, ignoring case
	async fn find_user(&self, field: UserField, value: &str) -> ClResult<Option<User>>;

	/// Lists users in creation order
	async fn list_users(&self, opts: &ListUserOptions) -> ClResult<Vec<User>>;

	/// Applies a partial update. Fails with `NotFound` if the user does not exist.
	async fn update_user(&self, user_id: &str, data: &UpdateUserData) -> ClResult<()>;
}

// vim: ts=4
