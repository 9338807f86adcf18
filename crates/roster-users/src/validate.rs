//! Request payload validation.
//!
//! Payloads are checked field by field against the user schema so that a wrong
//! type in one field is reported as that field's `INVALID_<FIELD>` error.
//! Email, username and user roles are lowercased here.

use regex::Regex;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use roster_types::utils::normalize;

use crate::prelude::*;
use crate::reconcile::MembershipSet;

static EMAIL_RE: LazyLock<Result<Regex, regex::Error>> =
	LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));

/// Validated payload of a create request
#[derive(Debug, Clone, Default)]
pub struct CreateUserInput {
	pub username: Option<Box<str>>,
	pub email: Option<Box<str>>,
	pub password: Option<Box<str>>,
	pub first_name: Option<Box<str>>,
	pub last_name: Option<Box<str>>,
	pub bio: Option<Box<str>>,
	pub timezone: Option<Box<str>>,
	pub facebook_url: Option<Box<str>>,
	pub twitter_url: Option<Box<str>>,
	pub image_id: Option<Box<str>>,
	pub roles: Vec<Box<str>>,
	pub organization_id: Option<Box<str>>,
	pub application_id: Option<Box<str>>,
	pub organizations: Option<MembershipSet>,
	pub applications: Option<MembershipSet>,
}

/// Validated payload of a full update request
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
	pub username: Patch<Box<str>>,
	pub email: Patch<Box<str>>,
	pub password: Option<Box<str>>,
	pub profile: ProfilePatch,
	pub roles: Patch<Vec<Box<str>>>,
	pub organizations: Option<MembershipSet>,
	pub applications: Option<MembershipSet>,
}

/// Validated payload of a profile update request
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
	pub first_name: Patch<Box<str>>,
	pub last_name: Patch<Box<str>>,
	pub bio: Patch<Box<str>>,
	pub timezone: Patch<Box<str>>,
	pub facebook_url: Patch<Box<str>>,
	pub twitter_url: Patch<Box<str>>,
	pub image_id: Patch<Box<str>>,
}

pub fn is_valid_email(email: &str) -> bool {
	matches!(&*EMAIL_RE, Ok(re) if re.is_match(email))
}

pub fn is_valid_timezone(timezone: &str) -> bool {
	timezone.parse::<chrono_tz::Tz>().is_ok()
}

fn as_object(body: &Value) -> ClResult<&Map<String, Value>> {
	body.as_object()
		.ok_or_else(|| Error::ValidationError("Request body must be a JSON object".into()))
}

/// Missing and `null` both read as absent
fn opt_string(map: &Map<String, Value>, field: Field) -> ClResult<Option<Box<str>>> {
	match map.get(field.key()) {
		None | Some(Value::Null) => Ok(None),
		Some(Value::String(s)) => Ok(Some(s.as_str().into())),
		Some(_) => Err(Error::InvalidField(field)),
	}
}

fn patch_string(map: &Map<String, Value>, field: Field) -> ClResult<Patch<Box<str>>> {
	match map.get(field.key()) {
		None => Ok(Patch::Undefined),
		Some(Value::Null) => Ok(Patch::Null),
		Some(Value::String(s)) => Ok(Patch::Value(s.as_str().into())),
		Some(_) => Err(Error::InvalidField(field)),
	}
}

fn string_list(value: &Value, field: Field) -> ClResult<Vec<Box<str>>> {
	let items = value.as_array().ok_or(Error::InvalidField(field))?;
	items
		.iter()
		.map(|item| item.as_str().map(Box::from).ok_or(Error::InvalidField(field)))
		.collect()
}

fn lowercase_roles(roles: Vec<Box<str>>) -> Vec<Box<str>> {
	roles.iter().map(|role| normalize(role)).collect()
}

fn check_email(email: Option<Box<str>>) -> ClResult<Option<Box<str>>> {
	match email {
		Some(email) => {
			let email = normalize(&email);
			if !is_valid_email(&email) {
				return Err(Error::InvalidField(Field::Email));
			}
			Ok(Some(email))
		}
		None => Ok(None),
	}
}

fn check_username(username: Option<Box<str>>) -> ClResult<Option<Box<str>>> {
	match username {
		Some(username) => {
			let username = normalize(&username);
			if username.is_empty() || username.chars().any(char::is_whitespace) {
				return Err(Error::InvalidField(Field::Username));
			}
			Ok(Some(username))
		}
		None => Ok(None),
	}
}

fn check_timezone(timezone: Option<&str>) -> ClResult<()> {
	match timezone {
		Some(tz) if !is_valid_timezone(tz) => Err(Error::InvalidField(Field::Timezone)),
		_ => Ok(()),
	}
}

/// Parses an id list plus its optional role map.
///
/// Returns `None` when the id list is absent; a role map without ids is ignored.
fn membership(
	map: &Map<String, Value>,
	ids_field: Field,
	roles_field: Field,
) -> ClResult<Option<MembershipSet>> {
	let Some(ids) = map.get(ids_field.key()) else {
		return Ok(None);
	};
	let ids = string_list(ids, ids_field)?;

	let mut seen = HashSet::with_capacity(ids.len());
	if ids.iter().any(|id| id.is_empty() || !seen.insert(id.as_ref())) {
		return Err(Error::InvalidField(ids_field));
	}

	let mut roles_by_id = HashMap::new();
	match map.get(roles_field.key()) {
		None | Some(Value::Null) => {}
		Some(Value::Object(roles)) => {
			for (owner_id, roles) in roles {
				roles_by_id.insert(Box::from(owner_id.as_str()), string_list(roles, roles_field)?);
			}
		}
		Some(_) => return Err(Error::InvalidField(roles_field)),
	}

	Ok(Some(MembershipSet { ids, roles_by_id }))
}

fn parse_profile(map: &Map<String, Value>) -> ClResult<ProfilePatch> {
	let profile = ProfilePatch {
		first_name: patch_string(map, Field::FirstName)?,
		last_name: patch_string(map, Field::LastName)?,
		bio: patch_string(map, Field::Bio)?,
		timezone: patch_string(map, Field::Timezone)?,
		facebook_url: patch_string(map, Field::FacebookUrl)?,
		twitter_url: patch_string(map, Field::TwitterUrl)?,
		image_id: patch_string(map, Field::ImageId)?,
	};
	check_timezone(profile.timezone.value().map(AsRef::as_ref))?;
	Ok(profile)
}

/// Validates a create payload
pub fn parse_create(body: &Value) -> ClResult<CreateUserInput> {
	let map = as_object(body)?;

	let input = CreateUserInput {
		username: check_username(opt_string(map, Field::Username)?)?,
		email: check_email(opt_string(map, Field::Email)?)?,
		password: opt_string(map, Field::Password)?,
		first_name: opt_string(map, Field::FirstName)?,
		last_name: opt_string(map, Field::LastName)?,
		bio: opt_string(map, Field::Bio)?,
		timezone: opt_string(map, Field::Timezone)?,
		facebook_url: opt_string(map, Field::FacebookUrl)?,
		twitter_url: opt_string(map, Field::TwitterUrl)?,
		image_id: opt_string(map, Field::ImageId)?,
		roles: match map.get(Field::Roles.key()) {
			None | Some(Value::Null) => Vec::new(),
			Some(roles) => lowercase_roles(string_list(roles, Field::Roles)?),
		},
		organization_id: opt_string(map, Field::OrganizationId)?,
		application_id: opt_string(map, Field::ApplicationId)?,
		organizations: membership(map, Field::OrganizationIds, Field::OrganizationRoles)?,
		applications: membership(map, Field::ApplicationIds, Field::ApplicationRoles)?,
	};
	check_timezone(input.timezone.as_deref())?;

	Ok(input)
}

/// Validates an update payload
pub fn parse_patch(body: &Value) -> ClResult<UserPatch> {
	let map = as_object(body)?;

	// Username and email can not be cleared, only replaced
	let username = match patch_string(map, Field::Username)? {
		Patch::Null => return Err(Error::InvalidField(Field::Username)),
		Patch::Value(v) => Patch::Value(
			check_username(Some(v))?.ok_or(Error::InvalidField(Field::Username))?,
		),
		Patch::Undefined => Patch::Undefined,
	};
	let email = match patch_string(map, Field::Email)? {
		Patch::Null => return Err(Error::InvalidField(Field::Email)),
		Patch::Value(v) => {
			Patch::Value(check_email(Some(v))?.ok_or(Error::InvalidField(Field::Email))?)
		}
		Patch::Undefined => Patch::Undefined,
	};
	let password = match map.get(Field::Password.key()) {
		None => None,
		Some(Value::String(s)) if !s.is_empty() => Some(Box::from(s.as_str())),
		Some(_) => return Err(Error::InvalidField(Field::Password)),
	};
	let roles = match map.get(Field::Roles.key()) {
		None => Patch::Undefined,
		Some(Value::Null) => Patch::Null,
		Some(roles) => Patch::Value(lowercase_roles(string_list(roles, Field::Roles)?)),
	};

	Ok(UserPatch {
		username,
		email,
		password,
		profile: parse_profile(map)?,
		roles,
		organizations: membership(map, Field::OrganizationIds, Field::OrganizationRoles)?,
		applications: membership(map, Field::ApplicationIds, Field::ApplicationRoles)?,
	})
}

/// Validates a profile update payload. Keys outside the profile are ignored.
pub fn parse_profile_patch(body: &Value) -> ClResult<ProfilePatch> {
	parse_profile(as_object(body)?)
}


// vim: ts=4
